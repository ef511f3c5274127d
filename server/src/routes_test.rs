use super::*;

#[test]
fn pkg_dir_is_under_site_root() {
    assert_eq!(pkg_dir(Path::new("target/site")), PathBuf::from("target/site/pkg"));
}

#[tokio::test]
async fn healthz_returns_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}
