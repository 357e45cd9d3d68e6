mod util;

use proptest::prelude::*;
use pyargs::prelude::*;
use util::*;

proptest! {
    #[test]
    fn positional_and_keyword_arguments_agree(
        x in any::<i64>(),
        y in -1e300f64..1e300,
        name in "\\PC*",
    ) {
        with_gil(|| {
            let args = Arguments::new((arg_i64("x"), arg_f64("y"), arg_string("name"))).unwrap();

            let positional = tuple(vec![int(x), float(y), string(&name)]);
            let by_position = args.parse(positional.obj(), None);

            let empty = tuple(vec![]);
            let kwargs = dict(vec![("x", int(x)), ("y", float(y)), ("name", string(&name))]);
            let by_keyword = args.parse(empty.obj(), Some(kwargs.obj()));

            let first = tuple(vec![int(x)]);
            let kwargs = dict(vec![("name", string(&name)), ("y", float(y))]);
            let mixed = args.parse(first.obj(), Some(kwargs.obj()));

            assert_eq!(by_position, Some((x, y, name.clone())));
            assert_eq!(by_keyword, by_position);
            assert_eq!(mixed, by_position);
        });
    }

    #[test]
    fn small_integers_fit_or_overflow(x in -1024i64..1024) {
        with_gil(|| {
            let args = Arguments::new((arg_u8("x"), arg_i16("y"))).unwrap();
            let input = tuple(vec![int(x), int(x)]);
            let out = args.parse(input.obj(), None);

            if (0..=255).contains(&x) {
                assert_eq!(out, Some((x as u8, x as i16)));
            } else {
                assert!(out.is_none());
                assert!(error_is(overflow_error()));
            }
        });
    }

    #[test]
    fn omitted_optionals_use_defaults(
        required in any::<i32>(),
        default in any::<i32>(),
        passed in proptest::option::of(any::<i32>()),
    ) {
        with_gil(|| {
            let args = Arguments::new((
                arg_i32("a"),
                optional(),
                arg_i32("b").with_default(default),
            ))
            .unwrap();

            let mut items = vec![int(required.into())];
            items.extend(passed.map(|p| int(p.into())));
            let input = tuple(items);

            let out = args.parse(input.obj(), None);
            assert_eq!(out, Some((required, passed.unwrap_or(default))));
        });
    }

    #[test]
    fn keywords_without_nul_are_accepted(keyword in "[a-z_][a-z0-9_]{0,15}") {
        let keyword: &'static str = Box::leak(keyword.into_boxed_str());
        let args = Arguments::new((arg_i32(keyword), arg_f64("Other"))).unwrap();
        let keywords: Vec<_> = args.keywords().map(|k| k.to_str().unwrap()).collect();
        prop_assert_eq!(keywords, [keyword, "Other"]);
        prop_assert_eq!(args.format().to_bytes(), b"id");
    }

    #[test]
    fn keywords_with_nul_are_rejected(prefix in "[a-z]{0,4}", suffix in "[a-z]{0,4}") {
        let keyword: &'static str = Box::leak(format!("{prefix}\0{suffix}").into_boxed_str());
        let err = Arguments::new((arg_i32(keyword),)).unwrap_err();
        prop_assert_eq!(err, ArgsError::InvalidKeyword(keyword.into()));
    }
}
