use depgraph::filter::FilterPolicy;
use depgraph::graph::Package;

fn pkg(path: &str) -> Package {
    Package {
        import_path: path.to_string(),
        is_platform: false,
        has_foreign_source: false,
        imports: Vec::new(),
    }
}

fn platform_pkg(path: &str) -> Package {
    Package {
        is_platform: true,
        ..pkg(path)
    }
}

#[test]
fn test_include_override_wins_over_every_rule() {
    let mut policy = FilterPolicy::new()
        .ignore_platform(true)
        .ignore_exact(["std/fmt"])
        .ignore_prefixes(["std"])
        .include_prefixes(["std/fmt"])
        .filter_by_base_path(true);
    policy.observe_root("github.com/x/app");

    // platform, exact-ignored, prefix-ignored and outside the base path,
    // yet the include prefix still wins
    assert!(!policy.is_ignored(&platform_pkg("std/fmt")));
    assert!(policy.is_ignored(&platform_pkg("std/io")));
}

#[test]
fn test_user_lists_match_case_insensitively() {
    let policy = FilterPolicy::new()
        .ignore_exact(["  FOO  "])
        .ignore_prefixes(["Vendor/"]);

    assert!(policy.is_ignored(&pkg("foo")));
    assert!(policy.is_ignored(&pkg("Foo")));
    assert!(policy.is_ignored(&pkg("vendor/x")));
    assert!(policy.is_ignored(&pkg("VENDOR/y")));
    assert!(!policy.is_ignored(&pkg("foobar")));
}

#[test]
fn test_base_path_matches_case_sensitively() {
    let mut policy = FilterPolicy::new().filter_by_base_path(true);
    policy.observe_root("github.com/X/app");

    assert_eq!(policy.base_path(), Some("github.com/X"));
    assert!(!policy.is_ignored(&pkg("github.com/X/lib")));
    assert!(policy.is_ignored(&pkg("github.com/x/lib")));
}

#[test]
fn test_foreign_interop_sentinel_is_preseeded() {
    let policy = FilterPolicy::new();

    assert!(policy.skip_resolution("C"));
    assert!(policy.skip_resolution("c"));
    assert!(!policy.skip_resolution("cc"));
}

#[test]
fn test_platform_toggle() {
    let off = FilterPolicy::new();
    let on = FilterPolicy::new().ignore_platform(true);

    assert!(!off.is_ignored(&platform_pkg("fmt")));
    assert!(on.is_ignored(&platform_pkg("fmt")));
    assert!(!on.is_ignored(&pkg("fmt")));
}

#[test]
fn test_base_path_fixed_by_first_observation_only() {
    let mut policy = FilterPolicy::new().filter_by_base_path(true);
    policy.observe_root("github.com/x/app");
    policy.observe_root("gitlab.com/y/other");

    assert_eq!(policy.base_path(), Some("github.com/x"));
}

#[test]
fn test_base_membership_predicates() {
    let mut policy = FilterPolicy::new().filter_by_base_path(true);

    // no base path set: neither inside nor outside
    assert!(!policy.in_base_path("anything"));
    assert!(!policy.outside_base("anything"));

    policy.observe_root("github.com/x/app");
    assert!(policy.in_base_path("github.com/x/lib"));
    assert!(!policy.outside_base("github.com/x/lib"));
    assert!(policy.outside_base("vendor/dep"));
    assert!(!policy.in_base_path("vendor/dep"));
}
