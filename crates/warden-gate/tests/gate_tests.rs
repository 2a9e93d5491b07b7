//! End-to-end access scenarios over small content trees.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::{RecordingProvider, add_file, alice, blog_tree, bob, build_tree, find_by_dirnames};
use warden_content::{ContentProvider, PageId};
use warden_core::{AccessConfig, AccessRule, Identity, evaluator};
use warden_gate::{
    CollectionFilter, Missing, NodeAccessService, PageGate, PageOutcome, PathGate, PathOutcome,
    RequestContext,
};

// ----------------------------------------------------------------------------
// Rule scenarios
// ----------------------------------------------------------------------------

#[test]
fn test_users_rule_scenario() {
    let rule = AccessRule::decode("{type: users, users: [alice]}");
    assert!(evaluator::is_accessible_by(&rule, &alice()));
    assert!(!evaluator::is_accessible_by(&rule, &bob()));
}

#[test]
fn test_roles_rule_scenario() {
    let rule = AccessRule::decode("{type: roles, roles: [editor]}");
    assert!(evaluator::is_accessible_by(
        &rule,
        &Identity::role_id("editor").unwrap()
    ));
    assert!(evaluator::is_accessible_by(
        &rule,
        &Identity::user("x", "editor").unwrap()
    ));
}

// ----------------------------------------------------------------------------
// Path walking
// ----------------------------------------------------------------------------

#[test]
fn test_restricted_post_blocks_anonymous() {
    let tree = blog_tree();
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let gate = PathGate::new(&service);
    let post = find_by_dirnames(&tree, "blog/post-1");

    assert_eq!(
        gate.resolve_path("blog/post-1/image.jpg", &Identity::Anonymous),
        PathOutcome::Forbidden { page: post }
    );
}

#[test]
fn test_restricted_post_admits_alice() {
    let tree = blog_tree();
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let gate = PathGate::new(&service);

    let outcome = gate.resolve_path("blog/post-1/image.jpg", &alice());
    let PathOutcome::Resolved(file) = outcome else {
        unreachable!("expected the image to resolve, got {outcome:?}");
    };
    assert_eq!(tree.file(file).unwrap().filename(), "image.jpg");
    assert_eq!(
        tree.file_owner(file),
        Some(find_by_dirnames(&tree, "blog/post-1"))
    );
}

#[test]
fn test_missing_page_is_not_found() {
    let tree = blog_tree();
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let gate = PathGate::new(&service);

    for identity in [Identity::Anonymous, alice(), Identity::role_id("admin").unwrap()] {
        assert_eq!(
            gate.resolve_path("missing-page/file.jpg", &identity),
            PathOutcome::NotFound(Missing::Page {
                parent: PageId::ROOT,
                segment: "missing-page".to_string(),
            })
        );
    }
}

#[test]
fn test_missing_file_is_not_found() {
    let tree = blog_tree();
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let gate = PathGate::new(&service);

    let outcome = gate.resolve_path("blog/post-2/other.png", &Identity::Anonymous);
    assert!(matches!(
        outcome,
        PathOutcome::NotFound(Missing::File { ref filename, .. }) if filename == "other.png"
    ));
}

#[test]
fn test_denial_wins_over_missing_descendant() {
    let tree = blog_tree();
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let gate = PathGate::new(&service);

    // Nothing below post-1 is looked up once post-1 denies.
    let outcome = gate.resolve_path("blog/post-1/nope/x.jpg", &bob());
    assert!(matches!(outcome, PathOutcome::Forbidden { .. }));
}

#[test]
fn test_ancestor_denial_short_circuits() {
    let mut tree = build_tree(&[
        ("a", Some("type: roles\nroles: [editor]")),
        ("a/b", Some("type: public")),
    ]);
    add_file(&mut tree, "a/b", "x");
    let a = find_by_dirnames(&tree, "a");
    let b = find_by_dirnames(&tree, "a/b");

    let provider = RecordingProvider::new(tree);
    let service = NodeAccessService::new(&provider, AccessConfig::default());
    let gate = PathGate::new(&service);

    let outcome = gate.resolve_path("a/b/x", &Identity::role_id("guest").unwrap());
    assert_eq!(outcome, PathOutcome::Forbidden { page: a });
    assert!(provider.was_read(a));
    assert!(!provider.was_read(b));
}

#[test]
fn test_deny_all_page_blocks_everyone() {
    let mut tree = build_tree(&[("vault", Some("0"))]);
    add_file(&mut tree, "vault", "key.txt");
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let gate = PathGate::new(&service);

    for identity in [
        Identity::Anonymous,
        alice(),
        Identity::role_id("admin").unwrap(),
    ] {
        assert!(matches!(
            gate.resolve_path("vault/key.txt", &identity),
            PathOutcome::Forbidden { .. }
        ));
    }
}

#[test]
fn test_context_variant_matches_explicit_identity() {
    let tree = blog_tree();
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let gate = PathGate::new(&service);
    let ctx = RequestContext::new(alice());

    assert_eq!(
        gate.resolve_path_current("blog/post-1/image.jpg", &ctx),
        gate.resolve_path("blog/post-1/image.jpg", &alice())
    );
}

// ----------------------------------------------------------------------------
// Consistency between direct and walked access
// ----------------------------------------------------------------------------

#[test]
fn test_page_and_path_gates_agree() {
    let mut tree = build_tree(&[
        ("a", Some("type: roles\nroles: [editor]")),
        ("a/b", Some("type: public")),
        ("c", None),
    ]);
    add_file(&mut tree, "a/b", "x");
    add_file(&mut tree, "c", "y");
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let paths = PathGate::new(&service);
    let pages = PageGate::new(&service);

    for identity in [
        Identity::Anonymous,
        Identity::role_id("guest").unwrap(),
        Identity::role_id("editor").unwrap(),
    ] {
        for (uid, path) in [("a/b", "a/b/x"), ("c", "c/y")] {
            let walked = paths.resolve_path(path, &identity).is_resolved();
            let direct = matches!(pages.resolve_page(uid, &identity), PageOutcome::Resolved(_));
            assert_eq!(walked, direct, "{identity} on {uid}");
        }
    }
}

#[test]
fn test_orphaned_file_is_filtered_out() {
    let mut tree = blog_tree();
    let stray = tree.add_detached_file("stray.pdf", None);
    let open = ContentProvider::file(&tree, find_by_dirnames(&tree, "blog/post-2"), "image.jpg")
        .unwrap();
    let service = NodeAccessService::new(&tree, AccessConfig::default());
    let filter = CollectionFilter::new(&service);

    let (yes, no) = filter.partition([stray, open], &alice());
    assert_eq!(yes, vec![open]);
    assert_eq!(no, vec![stray]);
}
