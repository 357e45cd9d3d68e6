/// Token that prevents methods of public traits from being called or implemented outside this
/// crate.
pub struct Private;
