use widget_core::AcceptFilter;

#[test]
fn default_filter_accepts_video_and_image() {
    let filter = AcceptFilter::default();
    assert!(filter.accepts("video/mp4"));
    assert!(filter.accepts("image/jpeg"));
    assert!(filter.accepts("IMAGE/PNG"));
    assert!(filter.accepts("video/webm; codecs=vp9"));
    assert!(!filter.accepts("application/pdf"));
    assert!(!filter.accepts("text/plain"));
    assert!(!filter.accepts("garbage"));
}

#[test]
fn exact_patterns_match_only_that_type() {
    let filter = AcceptFilter::new(["video/mp4", " "]);
    assert_eq!(filter.patterns().to_vec(), vec!["video/mp4".to_string()]);
    assert!(filter.accepts("video/mp4"));
    assert!(!filter.accepts("video/webm"));
}

#[test]
fn any_filter_accepts_everything() {
    let filter = AcceptFilter::any();
    assert!(filter.accepts("application/octet-stream"));
}
