#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Length parsing
// =============================================================

#[test]
fn parses_px_and_percent() {
    assert_eq!("60px".parse::<Length>(), Ok(Length::Px(60.0)));
    assert_eq!("35%".parse::<Length>(), Ok(Length::Percent(35.0)));
    assert_eq!(" 12.5 px ".parse::<Length>(), Ok(Length::Px(12.5)));
}

#[test]
fn rejects_unitless_and_garbage() {
    assert!("60".parse::<Length>().is_err());
    assert!("px".parse::<Length>().is_err());
    assert!("abc%".parse::<Length>().is_err());
    assert!("10em".parse::<Length>().is_err());
}

#[test]
fn display_matches_css() {
    assert_eq!(Length::Px(81.0).to_string(), "81px");
    assert_eq!(Length::Percent(52.0).to_string(), "52%");
}

#[test]
fn serde_uses_css_strings() {
    let json = serde_json::to_string(&Length::Percent(49.0)).unwrap();
    assert_eq!(json, "\"49%\"");
    let back: Length = serde_json::from_str("\"92px\"").unwrap();
    assert_eq!(back, Length::Px(92.0));
}

#[test]
fn serde_rejects_bad_length() {
    assert!(serde_json::from_str::<Length>("\"92\"").is_err());
}

// =============================================================
// Resolution
// =============================================================

#[test]
fn percent_resolves_against_container() {
    assert_eq!(Length::Percent(35.0).resolve(400.0), 140.0);
    assert_eq!(Length::Px(60.0).resolve(400.0), 60.0);
}

#[test]
fn first_default_template_resolves_on_400_box() {
    let slot = &default_templates()[0];
    let rect = slot.resolve(CanvasSize { width: 400.0, height: 400.0 });
    assert_eq!(rect, Rect::new(60.0, 130.0, 140.0, 240.0));
}

#[test]
fn percent_uses_matching_axis() {
    let slot = &default_templates()[1];
    let rect = slot.resolve(CanvasSize { width: 200.0, height: 400.0 });
    assert_eq!(rect.width, 104.0);
    assert_eq!(rect.height, 196.0);
}

#[test]
fn default_table_has_three_distinct_templates() {
    let templates = default_templates();
    assert_eq!(templates.len(), 3);
    assert_ne!(templates[0].template, templates[1].template);
    assert_ne!(templates[1].template, templates[2].template);
}

#[test]
fn slot_round_trips_through_json_shape() {
    let json = serde_json::json!({
        "template": "/style/custom.png",
        "top": "10px",
        "left": "5%",
        "width": "50%",
        "height": "120px"
    });
    let slot: TemplateSlot = serde_json::from_value(json).unwrap();
    assert_eq!(slot.template.as_str(), "/style/custom.png");
    assert_eq!(slot.left, Length::Percent(5.0));
    assert_eq!(slot.height, Length::Px(120.0));
}
