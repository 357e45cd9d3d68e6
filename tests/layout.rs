use pyargs::{prelude::*, signature::layout::Layout};

fn slots(layout: &Layout) -> Vec<(&'static str, usize, usize)> {
    layout
        .args()
        .iter()
        .map(|arg| (arg.format(), arg.raw_offset(), arg.slot_count()))
        .collect()
}

#[test]
fn catalog_formats() {
    let args = Arguments::new((
        arg_u8("a"),
        arg_u8_unchecked("b"),
        arg_i16("c"),
        arg_u16("d"),
        arg_i32("e"),
        arg_u32("f"),
        arg_long("g"),
        arg_ulong("h"),
        arg_i64("i"),
        arg_u64("j"),
        arg_isize("k"),
        arg_f32("l"),
        arg_f64("m"),
        arg_complex("n"),
        arg_byte_char("o"),
        arg_char("p"),
        arg_bool("q"),
    ))
    .unwrap();

    assert_eq!(args.format(), c"bBhHiIlkLKnfdDcCp");
    assert_eq!(args.layout().slot_count(), 17);
    assert_eq!(args.layout().value_count(), 17);
}

#[test]
fn string_and_object_formats() {
    let args = Arguments::new((
        arg_str("a"),
        arg_opt_str("b"),
        arg_bytes("c"),
        arg_c_str("d"),
        arg_opt_c_str("e"),
        arg_bytes_c_str("f"),
        arg_str_buffer("g"),
        arg_byte_buffer("h"),
        arg_opt_buffer("i"),
        arg_object("j"),
        arg_bytes_object("k"),
        arg_byte_array_object("l"),
        arg_unicode_object("m"),
        arg_typed::<ListType>("n"),
        arg_path("o"),
    ))
    .unwrap();

    assert_eq!(args.format(), c"s#z#y#szys*y*z*OSYUO!O&");
    assert_eq!(
        slots(args.layout()),
        [
            ("s#", 0, 2),
            ("z#", 2, 2),
            ("y#", 4, 2),
            ("s", 6, 1),
            ("z", 7, 1),
            ("y", 8, 1),
            ("s*", 9, 1),
            ("y*", 10, 1),
            ("z*", 11, 1),
            ("O", 12, 1),
            ("S", 13, 1),
            ("Y", 14, 1),
            ("U", 15, 1),
            ("O!", 16, 2),
            ("O&", 18, 2),
        ]
    );
}

#[test]
fn writable_buffer_format() {
    let args = Arguments::new((arg_writable_buffer("a"), optional(), arg_writable_buffer("b")))
        .unwrap();

    assert_eq!(args.format(), c"w*|w*");
    assert_eq!(slots(args.layout()), [("w*", 0, 1), ("|", 1, 0), ("w*", 1, 1)]);
}

#[test]
fn encoded_formats() {
    let args = Arguments::new((
        arg_encoded::<Utf8>("a"),
        arg_encoded_text::<Latin1>("b"),
        arg_encoded_len::<Utf16>("c"),
        arg_encoded_text_len::<Utf32>("d"),
    ))
    .unwrap();

    assert_eq!(args.format(), c"esetes#et#");
    assert_eq!(
        slots(args.layout()),
        [("es", 0, 2), ("et", 2, 2), ("es#", 4, 3), ("et#", 7, 3)]
    );
}

#[test]
fn keyword_table() {
    let args = Arguments::new((
        arg_i32("a").positional_only(),
        arg_i32("b"),
        optional(),
        arg_str("c"),
        kw_only(),
        arg_f64("d"),
    ))
    .unwrap();

    let keywords: Vec<_> = args.keywords().map(|k| k.to_bytes()).collect();
    assert_eq!(keywords, [&b""[..], &b"b"[..], &b"c"[..], &b"d"[..]]);
    assert_eq!(args.format(), c"ii|s#$d");

    let indices: Vec<_> = args
        .layout()
        .args()
        .iter()
        .map(|arg| arg.keyword_index())
        .collect();
    assert_eq!(indices, [Some(0), Some(1), None, Some(2), None, Some(3)]);
}

#[test]
fn rejected_signatures() {
    assert_eq!(
        Arguments::new((arg_i32("a"), optional(), arg_i32("a"))).unwrap_err(),
        ArgsError::DuplicateKeyword("a".into())
    );
    assert_eq!(
        Arguments::new((kw_only(), optional())).unwrap_err(),
        ArgsError::MarkerOrder
    );
    assert_eq!(
        Arguments::new((arg_i32("a"), pos_only(), pos_only())).unwrap_err(),
        ArgsError::RepeatedMarker(pyargs::arg::Marker::PositionalOnly)
    );
}

#[test]
fn arguments_are_shareable() {
    fn assert_sync<T: Send + Sync>(_: &T) {}

    let args = Arguments::new((arg_typed::<DictType>("a"), arg_path("b"))).unwrap();
    assert_sync(&args);
}
