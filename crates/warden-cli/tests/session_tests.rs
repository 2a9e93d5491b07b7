//! Commands run against a content directory on disk.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use warden_cli::{Session, Status};
use warden_content::ContentProvider;
use warden_core::{AccessConfig, Identity};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "site.txt", "Title: Demo\n");
    write(root, "home/home.txt", "Title: Home\n");
    write(root, "error/error.txt", "Title: Error\n");
    write(
        root,
        "1-members/members.txt",
        "Title: Members\n\n----\n\nAccess:\n\ntype: roles\nroles:\n  - member\n",
    );
    write(root, "1-members/handbook.pdf", "pdf");
    write(root, "2-news/news.md", "---\ntitle: News\n---\nBody\n");
    write(root, "2-news/photo.jpg", "jpg");
    dir
}

#[tokio::test]
async fn test_resolve_over_loaded_site() {
    let dir = site();
    let session = Session::load(dir.path(), AccessConfig::default())
        .await
        .unwrap();

    let member = Identity::user("ann", "member").unwrap();
    let ok = session.resolve("1-members/handbook.pdf", &member);
    assert_eq!(ok.status, Status::Ok);
    assert!(ok.details.iter().any(|d| d.starts_with("file at ")));

    let denied = session.resolve("1-members/handbook.pdf", &Identity::Anonymous);
    assert_eq!(denied.status, Status::Forbidden);

    let open = session.resolve("2-news/photo.jpg", &Identity::Anonymous);
    assert_eq!(open.status, Status::Ok);
}

#[tokio::test]
async fn test_page_falls_back_and_redirects() {
    let dir = site();
    let access = AccessConfig::default().with_redirect("/login");
    let session = Session::load(dir.path(), access).await.unwrap();

    let missing = session.page("nowhere", &Identity::Anonymous);
    assert_eq!(missing.status, Status::NotFound);
    assert!(missing.summary.starts_with("error page: error"));

    let redirected = session.page("members", &Identity::Anonymous);
    assert_eq!(redirected.status, Status::Forbidden);
    assert_eq!(redirected.summary, "redirect: /login");

    let home = session.page("/", &Identity::Anonymous);
    assert_eq!(home.summary, "page: home");
}

#[tokio::test]
async fn test_ls_root_for_anonymous() {
    let dir = site();
    let session = Session::load(dir.path(), AccessConfig::default())
        .await
        .unwrap();

    let report = session.ls(None, &Identity::Anonymous);
    assert_eq!(report.status, Status::Ok);
    assert!(report.details.contains(&"- members".to_string()));
    assert!(report.details.contains(&"+ news".to_string()));
}

#[tokio::test]
async fn test_missing_content_root_is_error() {
    let dir = TempDir::new().unwrap();
    let result = Session::load(&dir.path().join("absent"), AccessConfig::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_file_meta_data_keeps_page_restricted() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "secret/post.txt",
        "Title: Secret\n\n----\n\nAccess:\n\ntype: users\nusers: [alice]\n",
    );
    write(root, "secret/avatar.jpg", "jpg");
    write(root, "secret/avatar.jpg.txt", "Caption: A face\n");

    let session = Session::load(root, AccessConfig::default()).await.unwrap();

    let denied = session.resolve("secret/avatar.jpg", &Identity::Anonymous);
    assert_eq!(denied.status, Status::Forbidden);

    let alice = Identity::user("alice", "member").unwrap();
    assert_eq!(session.resolve("secret/avatar.jpg", &alice).status, Status::Ok);
    assert_eq!(
        session.resolve("secret/avatar.jpg.txt", &alice).status,
        Status::NotFound
    );
}

#[tokio::test]
async fn test_custom_rule_field_and_templates() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "club/a.md", "---\ntitle: Scratch\n---\n");
    write(root, "club/club.txt", "Title: Club\n\n----\n\nFirewall: 0\n");
    write(root, "club/map.pdf", "pdf");

    let access = AccessConfig::default().with_field_name("firewall");
    let session = Session::load_with_templates(root, access, vec!["club".into()])
        .await
        .unwrap();

    let page = session.tree().page_by_id("club").unwrap();
    assert_eq!(session.tree().field(page, "title"), Some("Club"));
    let report = session.resolve("club/map.pdf", &Identity::role_id("admin").unwrap());
    assert_eq!(report.status, Status::Forbidden);
}
