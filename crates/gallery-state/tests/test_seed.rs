#[cfg(test)]
mod tests {
    use gallery_state::seed::{self, ScanOptions, SeedError, Source};
    use gallery_types::{ImageSource, SortOrder, Span};
    use std::fs;
    use std::path::Path;

    #[tokio::test]
    async fn test_scan_dir_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["img10.png", "img2.jpg", "notes.txt", ".hidden.png", "img1.webp"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let paths = seed::scan_dir(dir.path(), ScanOptions::default())
            .await
            .unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["img1.webp", "img2.jpg", "img10.png"]);
    }

    #[tokio::test]
    async fn test_scan_dir_hidden_and_descending() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", ".b.png"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let options = ScanOptions {
            include_hidden: true,
            sort_order: SortOrder::Descending,
            ..ScanOptions::default()
        };
        let paths = seed::scan_dir(dir.path(), options).await.unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a.png"));
    }

    #[tokio::test]
    async fn test_load_directory_source_allocates_ids() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fern.png"), b"").unwrap();
        fs::write(dir.path().join("honey.png"), b"").unwrap();

        let source = Source::from_path(dir.path()).unwrap();
        let items = seed::load(source, ScanOptions::default()).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "fern");
        assert_eq!(items[1].title, "honey");
        assert_ne!(items[0].id, items[1].id);
        assert!(items.iter().all(|item| item.span == Span::UNIT));
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let result = seed::scan_dir(Path::new("/definitely/not/here"), ScanOptions::default()).await;
        assert!(matches!(result, Err(SeedError::Io(_))));
    }

    #[test]
    fn test_source_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("gallery.toml");
        let photo = dir.path().join("photo.jpg");
        fs::write(&manifest, "").unwrap();
        fs::write(&photo, b"").unwrap();

        assert_eq!(
            Source::from_path(&manifest),
            Some(Source::Manifest(manifest.clone()))
        );
        assert_eq!(
            Source::from_path(&photo),
            Some(Source::Directory(dir.path().to_path_buf()))
        );
        assert_eq!(Source::from_path(&dir.path().join("missing")), None);
    }

    #[test]
    fn test_parse_manifest() {
        let content = r#"
            [[item]]
            title = "Breakfast"
            src = "https://images.unsplash.com/photo-1551963831-b3b1ca40c98e"
            rows = 2
            cols = 2

            [[item]]
            title = "Fern"
            src = "fern.jpg"
        "#;

        let items = seed::parse_manifest(content, Path::new("/photos")).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].span, Span::new(2, 2));
        assert!(items[0].source.is_remote());
        assert_eq!(items[1].span, Span::UNIT);
        assert_eq!(
            items[1].source,
            ImageSource::Path("/photos/fern.jpg".into())
        );
    }

    #[test]
    fn test_manifest_rejects_zero_span() {
        let content = r#"
            [[item]]
            title = "Flat"
            src = "flat.jpg"
            rows = 0
        "#;

        let result = seed::parse_manifest(content, Path::new("/photos"));
        assert!(matches!(result, Err(SeedError::ZeroSpan(title)) if title == "Flat"));
    }

    #[test]
    fn test_manifest_syntax_error() {
        let result = seed::parse_manifest("[[item]\ntitle =", Path::new("/"));
        assert!(matches!(result, Err(SeedError::Manifest(_))));
    }

    #[test]
    fn test_demo_manifest_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/gallery.toml");
        let items = seed::load_manifest(&path).unwrap();

        assert_eq!(items.len(), 11);
        assert_eq!(items[0].title, "Breakfast");
        assert_eq!(items[0].span, Span::new(2, 2));
    }
}
