use codebundle_core::{
    BundleConfig, DEFAULT_EXCLUDE_DIRS, DEFAULT_EXTENSIONS, Decision, InclusionFilter, is_under,
};
use std::path::{Path, PathBuf};

#[test]
fn test_everything_under_excluded_dir_is_rejected() {
    let filter = InclusionFilter::default();

    for dir in DEFAULT_EXCLUDE_DIRS {
        for file in ["x.py", "deep/er/x.js", "README.md"] {
            let path = Path::new(dir).join(file);
            assert!(!filter.should_include(&path), "{}", path.display());
        }
    }
}

#[test]
fn test_every_allowed_extension_is_accepted() {
    let filter = InclusionFilter::default();

    for ext in DEFAULT_EXTENSIONS {
        let lower = format!("src/file{ext}");
        let upper = format!("src/file{}", ext.to_uppercase());
        assert!(filter.should_include(&lower), "{lower}");
        assert!(filter.should_include(&upper), "{upper}");
    }
}

#[test]
fn test_build_prefix_semantics() {
    let filter = InclusionFilter::new(["build"], [".py"]);

    assert!(filter.should_include("build-extra/file.py"));
    assert!(!filter.should_include("build/sub/file.py"));
    assert!(!filter.should_include("./build/file.py"));
    assert!(!filter.should_include("src/../build/file.py"));
}

#[test]
fn test_filter_from_config() {
    let config = BundleConfig::builder()
        .exclude_dirs(vec![PathBuf::from("third_party/")])
        .extensions(vec!["rs".to_string(), ".TOML".to_string()])
        .build()
        .unwrap();
    let filter = InclusionFilter::from_config(&config);

    assert_eq!(filter.exclude_dirs(), &[PathBuf::from("third_party")]);
    assert_eq!(filter.extensions(), vec!["rs", "toml"]);
    assert!(filter.should_include("Cargo.toml"));
    assert!(!filter.should_include("third_party/lib.rs"));
    assert!(!filter.should_include("main.py"));
}

#[test]
fn test_decide_reports_reason() {
    let filter = InclusionFilter::new(["dist"], [".js"]).with_output_path("/p/out.js");

    let cases = [
        ("app.js", "/p/app.js", Decision::Include),
        ("out.js", "/p/out.js", Decision::OutputFile),
        ("dist/app.js", "/p/dist/app.js", Decision::ExcludedDir),
        ("app.ts", "/p/app.ts", Decision::ExtensionNotAllowed),
    ];
    for (relative, absolute, expected) in cases {
        assert_eq!(
            filter.decide(Path::new(relative), Path::new(absolute)),
            expected,
            "{relative}"
        );
    }
}

#[test]
fn test_is_under_segments() {
    assert!(is_under("a/b/c", "a/b"));
    assert!(is_under("a/b", "a/b"));
    assert!(!is_under("a/bc", "a/b"));
    assert!(!is_under("a", "a/b"));
}
