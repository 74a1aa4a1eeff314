//! Tests for media query list evaluation.

use strata_common::media::{
    MediaContext, MediaFeature, MediaQueryItem, MediaQueryList, MediaType, Orientation,
};

fn screen(width: i32, height: i32) -> MediaContext {
    MediaContext {
        media: MediaType::Screen,
        width,
        height,
    }
}

#[test]
fn test_empty_list_matches_everything() {
    let list = MediaQueryList::new();
    assert!(list.eval(&screen(800, 600)));
    assert!(list.eval(&MediaContext {
        media: MediaType::Print,
        width: 0,
        height: 0,
    }));
}

#[test]
fn test_list_is_or_of_items() {
    let list: MediaQueryList = [
        MediaQueryItem {
            media_type: MediaType::Print,
            features: vec![],
        },
        MediaQueryItem {
            media_type: MediaType::Screen,
            features: vec![MediaFeature::MinWidth(1024)],
        },
    ]
    .into_iter()
    .collect();

    assert!(!list.eval(&screen(800, 600)));
    assert!(list.eval(&screen(1280, 720)));
    assert!(list.eval(&MediaContext {
        media: MediaType::Print,
        width: 10,
        height: 10,
    }));
}

#[test]
fn test_item_features_are_anded() {
    let item = MediaQueryItem {
        media_type: MediaType::All,
        features: vec![MediaFeature::MinWidth(400), MediaFeature::MaxWidth(900)],
    };
    assert!(item.eval(&screen(600, 600)));
    assert!(!item.eval(&screen(300, 600)));
    assert!(!item.eval(&screen(1000, 600)));
}

#[test]
fn test_orientation_feature() {
    let mut list = MediaQueryList::new();
    list.add_media_query_item(MediaQueryItem {
        media_type: MediaType::All,
        features: vec![MediaFeature::Orientation(Orientation::Portrait)],
    });
    assert!(list.eval(&screen(600, 600)));
    assert!(!list.eval(&screen(800, 600)));
    assert_eq!(list.items().len(), 1);
}

#[test]
fn test_height_features() {
    let item = MediaQueryItem {
        media_type: MediaType::Screen,
        features: vec![MediaFeature::MinHeight(500), MediaFeature::MaxHeight(700)],
    };
    assert!(item.eval(&screen(100, 600)));
    assert!(!item.eval(&screen(100, 800)));
}
