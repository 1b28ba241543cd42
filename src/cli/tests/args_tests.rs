use clap::Parser;

use super::args::{AccessLevelArg, CliArgs, EmitFormat};
use spysmith_common::AccessLevel;

#[test]
fn test_parses_defaults() {
    let args = CliArgs::try_parse_from(["spysmith", "service.json"]).expect("args should parse");

    assert_eq!(args.access_level, None);
    assert_eq!(args.preprocessor_flag, None);
    assert_eq!(args.inherited_type, None);
    assert_eq!(args.emit, EmitFormat::Swift);
    assert!(args.out_dir.is_none());
    assert!(!args.no_color);
    assert_eq!(args.verbose, 0);
    assert_eq!(args.inputs, vec![std::path::PathBuf::from("service.json")]);
}

#[test]
fn test_parses_common_flags() {
    let args = CliArgs::try_parse_from([
        "spysmith",
        "--access-level",
        "public",
        "--preprocessor-flag",
        "DEBUG",
        "--inherited-type",
        "NSObject",
        "--emit",
        "json",
        "--out-dir",
        "Generated",
        "protocols",
        "extra.json",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.access_level, Some(AccessLevelArg::Public));
    assert_eq!(args.preprocessor_flag.as_deref(), Some("DEBUG"));
    assert_eq!(args.inherited_type.as_deref(), Some("NSObject"));
    assert_eq!(args.emit, EmitFormat::Json);
    assert_eq!(
        args.out_dir.as_deref(),
        Some(std::path::Path::new("Generated"))
    );
    assert_eq!(args.inputs.len(), 2);
}

#[test]
fn test_requires_an_input() {
    assert!(CliArgs::try_parse_from(["spysmith"]).is_err());
}

#[test]
fn test_rejects_unknown_access_level() {
    assert!(CliArgs::try_parse_from(["spysmith", "--access-level", "secret", "a.json"]).is_err());
}

#[test]
fn test_access_level_args_map_to_levels() {
    assert_eq!(AccessLevel::from(AccessLevelArg::Private), AccessLevel::Private);
    assert_eq!(
        AccessLevel::from(AccessLevelArg::Fileprivate),
        AccessLevel::Fileprivate
    );
    assert_eq!(AccessLevel::from(AccessLevelArg::Open), AccessLevel::Open);
    assert_eq!(EmitFormat::Swift.extension(), "swift");
    assert_eq!(EmitFormat::Json.extension(), "json");
}

#[test]
fn test_verbosity_counts_repeats() {
    let args = CliArgs::try_parse_from(["spysmith", "-vv", "a.json"]).expect("args should parse");
    assert_eq!(args.verbose, 2);
    let args =
        CliArgs::try_parse_from(["spysmith", "--verbose", "a.json"]).expect("args should parse");
    assert_eq!(args.verbose, 1);
}
