// Integration tests driving the public API the way a framework would:
// build one tree from a realistic pages layout, then throw request paths
// at it.

use pretty_assertions::assert_eq;
use rstest::rstest;
use virgule_router::{ParamValue, RouteTree};

fn pages_tree() -> RouteTree {
    let mut tree = RouteTree::new();
    for file in [
        "index.rs",
        "about.rs",
        "blog/index.rs",
        "blog/[slug].rs",
        "shop/items/[id].rs",
        "shop/items/featured.rs",
        "docs/[[...slug]].rs",
        "files/[...path].rs",
    ] {
        tree.insert(file).unwrap();
    }
    tree
}

#[rstest]
#[case("/", "index.rs")]
#[case("/about", "about.rs")]
#[case("/blog", "blog/index.rs")]
#[case("/blog/first-post", "blog/[slug].rs")]
#[case("/shop/items/featured", "shop/items/featured.rs")]
#[case("/shop/items/123", "shop/items/[id].rs")]
#[case("/docs", "docs/[[...slug]].rs")]
#[case("/docs/guide/intro", "docs/[[...slug]].rs")]
#[case("/files/report.pdf", "files/[...path].rs")]
fn resolves_to_expected_file(#[case] request: &str, #[case] expected: &str) {
    let tree = pages_tree();
    let hit = tree.match_route(request).expect(request);
    assert_eq!(hit.file_path, expected);
}

#[rstest]
#[case("/missing")]
#[case("/blog/a/b")]
#[case("/shop")]
#[case("/shop/items")]
#[case("/files")]
fn unrouted_paths_are_misses(#[case] request: &str) {
    let tree = pages_tree();
    assert_eq!(tree.match_route(request), None);
}

#[rstest]
#[case("/blog/hello", "/blog/hello")]
#[case("/blog/hello", "//blog//hello/")]
#[case("/docs/a/b", "/docs/a/b///")]
fn slash_noise_does_not_change_the_result(#[case] canonical: &str, #[case] noisy: &str) {
    let tree = pages_tree();
    assert_eq!(tree.match_route(canonical), tree.match_route(noisy));
}

#[test]
fn params_carry_single_and_sequence_values() {
    let tree = pages_tree();

    let hit = tree.match_route("/shop/items/123").unwrap();
    assert_eq!(hit.params["id"], ParamValue::Single("123".to_string()));

    let hit = tree.match_route("/docs/guide/intro").unwrap();
    assert_eq!(
        hit.params["slug"],
        ParamValue::Many(vec!["guide".to_string(), "intro".to_string()])
    );

    let hit = tree.match_route("/docs").unwrap();
    assert_eq!(hit.params["slug"], ParamValue::Many(Vec::new()));
}

#[test]
fn empty_params_and_no_match_are_distinguishable() {
    let tree = pages_tree();

    let hit = tree.match_route("/about").unwrap();
    assert!(hit.params.is_empty());

    assert!(tree.match_route("/nowhere").is_none());
}
