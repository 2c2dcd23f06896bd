//! Integration Tests: a board page driven end to end through `dispatch`.

use std::time::Duration;

use roster_core::types::MemberId;
use roster_core::RosterConfig;
use roster_page::dom::{classes, ids, Document, ElementId, EventKind, ImageOutcome};
use roster_page::listeners::slots;
use roster_page::{BoardPage, OverlayPhase, PageError, PageEvent, PageStatus, Section};
use roster_source::{MemberSource, SourceClient};

const PAYLOAD: &str = r#"[
    {"id": 1, "fName": "Anil", "lName": "Patel", "department": "YOUTH LEAGUE", "appointedOn": 2019, "relievedOn": 2021, "position": "Chair"},
    {"id": 2, "fName": "Anita", "lName": "Desai", "department": "BOARD MEMBERS", "appointedOn": 2015, "relievedOn": 2016, "profilePic": "pics/anita.jpg"},
    {"id": 3, "fName": "Ravi", "lName": "Shah", "department": "board members", "appointedOn": "2020", "relievedOn": "2020"}
]"#;

/// Initialise a page from a temp file holding `payload`, with the year select
/// preset to `year`.
async fn page_with(payload: &str, year: &str) -> BoardPage {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("members.json");
    std::fs::write(&path, payload).expect("write");

    let mut doc = Document::board_page();
    doc.set_value(ids::YEAR_SELECT, year);
    BoardPage::initialize(
        RosterConfig::default(),
        doc,
        &SourceClient::new(1000),
        &MemberSource::File { path },
    )
    .await
    .expect("initialize")
}

fn card_ids(page: &BoardPage, container: &str) -> Vec<u64> {
    page.with_state(|st| st.document().cards(container).map(|c| c.member_id.0).collect())
}

fn message(page: &BoardPage, container: &str) -> Option<String> {
    page.with_state(|st| st.document().message(container).map(|m| m.text.clone()))
}

// ---------------------------------------------------------------------------
// Initialisation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initial_render_uses_selected_year() {
    let page = page_with(PAYLOAD, "2020").await;

    assert_eq!(page.status(), PageStatus::Ready);
    assert_eq!(card_ids(&page, "youth-league"), vec![1]);
    assert_eq!(card_ids(&page, "board-members"), vec![3]);
    assert_eq!(message(&page, "trustees").as_deref(), Some("No results!"));

    page.with_state(|st| {
        assert!(st.listeners().is_active(Section::Search, slots::SEARCH_INPUT));
        assert!(st.listeners().is_active(Section::Search, slots::SEARCH_FOCUS_IN));
        assert!(st.listeners().is_active(Section::Search, slots::SEARCH_FOCUS_OUT));
        assert!(!st.listeners().is_active(Section::Search, slots::CLICK));
        assert!(st.listeners().is_active(Section::Controls, slots::YEAR_CHANGE));
    });
}

#[tokio::test]
async fn failed_load_renders_error_everywhere() {
    let page = page_with("<html>not json</html>", "2020").await;

    assert_eq!(page.status(), PageStatus::Failed);
    page.with_state(|st| {
        assert!(st.store().is_empty());
        assert!(st.load_error().is_some());
        for dept in roster_core::types::Department::ALL {
            let msg = st.document().message(dept.container_id()).expect("message");
            assert!(msg.is_error);
            assert_eq!(msg.text, "Error! Please try again later.");
            assert!(!st.document().has_class(dept.container_id(), classes::LOADING));
        }
        assert!(!st.listeners().is_active(Section::Search, slots::SEARCH_INPUT));
    });
}

#[tokio::test]
async fn missing_element_is_fatal() {
    let mut doc = Document::board_page();
    doc.remove_element(ids::SEARCH_RESULTS);
    let err = BoardPage::initialize(
        RosterConfig::default(),
        doc,
        &SourceClient::new(1000),
        &MemberSource::File { path: "/unused".into() },
    )
    .await
    .expect_err("missing element");
    assert!(matches!(err, PageError::MissingElement(id) if id == ids::SEARCH_RESULTS));
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let mut config = RosterConfig::default();
    config.search.min_query_len = 0;
    let err = BoardPage::initialize(
        config,
        Document::board_page(),
        &SourceClient::new(1000),
        &MemberSource::File { path: "/unused".into() },
    )
    .await
    .expect_err("invalid config");
    assert!(matches!(err, PageError::Config(_)));
}

// ---------------------------------------------------------------------------
// Year controls
// ---------------------------------------------------------------------------

#[tokio::test]
async fn year_change_rerenders_departments() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::change(ids::YEAR_SELECT, "2015"));
    assert_eq!(card_ids(&page, "board-members"), vec![2]);
    assert_eq!(message(&page, "youth-league").as_deref(), Some("No results!"));

    page.dispatch(PageEvent::change(ids::YEAR_SELECT, "not a year"));
    for dept in roster_core::types::Department::ALL {
        assert_eq!(message(&page, dept.container_id()).as_deref(), Some("No results!"));
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn search_is_debounced_and_uses_latest_input() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::input(ids::SEARCH_INPUT, "ani"));
    tokio::time::sleep(Duration::from_millis(400)).await;
    page.dispatch(PageEvent::input(ids::SEARCH_INPUT, "anil"));
    assert!(page.with_state(|st| st.document().has_class(ids::SEARCH_RESULTS, classes::LOADING)));

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert!(card_ids(&page, ids::SEARCH_RESULTS).is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(card_ids(&page, ids::SEARCH_RESULTS), vec![1]);
    page.with_state(|st| {
        assert!(!st.document().has_class(ids::SEARCH_RESULTS, classes::LOADING));
        assert!(st.listeners().is_active(Section::Search, slots::CLICK));
    });
    assert_eq!(page.debouncer().stats().total_superseded, 1);
}

#[tokio::test(start_paused = true)]
async fn short_query_prompts_immediately() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::input(ids::SEARCH_INPUT, "an"));
    assert_eq!(message(&page, ids::SEARCH_RESULTS).as_deref(), Some("Try searching!"));
    assert!(!page.debouncer().pending("input"));
}

#[tokio::test(start_paused = true)]
async fn erased_query_does_not_show_stale_results() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::input(ids::SEARCH_INPUT, "anil"));
    tokio::time::sleep(Duration::from_millis(500)).await;
    // The field is cleared without an input event reaching the page.
    page.dispatch(PageEvent::Change {
        target: ElementId::new(ids::SEARCH_INPUT),
        value: String::new(),
    });

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(card_ids(&page, ids::SEARCH_RESULTS).is_empty());
    assert_eq!(message(&page, ids::SEARCH_RESULTS).as_deref(), Some("Try searching!"));
}

#[tokio::test(start_paused = true)]
async fn clicking_search_result_selects_its_year() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::FocusIn {
        target: ElementId::new(ids::SEARCH_INPUT),
    });
    page.dispatch(PageEvent::input(ids::SEARCH_INPUT, "anita"));
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(card_ids(&page, ids::SEARCH_RESULTS), vec![2]);

    page.dispatch(PageEvent::click_card(ids::SEARCH_RESULTS, MemberId(2)));
    page.with_state(|st| {
        assert_eq!(st.document().value(ids::YEAR_SELECT), "2015");
        assert!(st.document().active_element().is_none());
        assert_eq!(
            st.document().cards("board-members").map(|c| c.member_id.0).collect::<Vec<_>>(),
            vec![2]
        );
    });
}

#[tokio::test(start_paused = true)]
async fn focus_state_follows_search_bar() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::FocusIn {
        target: ElementId::new(ids::SEARCH_INPUT),
    });
    assert!(page.with_state(|st| st.document().has_class(ids::SEARCH_BAR, classes::ACTIVE)));

    // Focus moves to the results list: still inside the search container.
    page.dispatch(PageEvent::FocusOut {
        target: ElementId::new(ids::SEARCH_INPUT),
        related: Some(ElementId::new(ids::SEARCH_RESULTS)),
    });
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(page.with_state(|st| st.document().has_class(ids::SEARCH_BAR, classes::ACTIVE)));

    page.dispatch(PageEvent::FocusOut {
        target: ElementId::new(ids::SEARCH_RESULTS),
        related: None,
    });
    tokio::time::sleep(Duration::from_millis(499)).await;
    assert!(page.with_state(|st| st.document().has_class(ids::SEARCH_BAR, classes::ACTIVE)));
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!page.with_state(|st| st.document().has_class(ids::SEARCH_BAR, classes::ACTIVE)));
}

#[tokio::test(start_paused = true)]
async fn result_click_releases_search_bar() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::FocusIn {
        target: ElementId::new(ids::SEARCH_INPUT),
    });
    page.dispatch(PageEvent::input(ids::SEARCH_INPUT, "anita"));
    tokio::time::sleep(Duration::from_millis(1100)).await;
    page.dispatch(PageEvent::click_card(ids::SEARCH_RESULTS, MemberId(2)));
    assert!(page.debouncer().pending("focus"));

    tokio::time::sleep(Duration::from_millis(600)).await;
    page.with_state(|st| {
        assert!(st.document().active_element().is_none());
        assert!(!st.document().has_class(ids::SEARCH_BAR, classes::ACTIVE));
    });
}

#[tokio::test(start_paused = true)]
async fn escape_releases_search_bar() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::FocusIn {
        target: ElementId::new(ids::SEARCH_INPUT),
    });
    assert!(page.with_state(|st| st.document().has_class(ids::SEARCH_BAR, classes::ACTIVE)));

    page.dispatch(PageEvent::key("Escape"));
    tokio::time::sleep(Duration::from_millis(600)).await;
    page.with_state(|st| {
        assert!(st.document().active_element().is_none());
        assert!(!st.document().has_class(ids::SEARCH_BAR, classes::ACTIVE));
    });

    // Nothing focused: Escape schedules no focus-out.
    page.dispatch(PageEvent::key("Escape"));
    assert!(!page.debouncer().pending("focus"));
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn card_image_click_opens_overlay() {
    let page = page_with(PAYLOAD, "2020").await;

    page.dispatch(PageEvent::click_card("youth-league", MemberId(1)));
    assert_eq!(page.with_state(|st| st.overlay_phase()), OverlayPhase::Closed);

    page.dispatch(PageEvent::click_image("youth-league", MemberId(1)));
    page.with_state(|st| {
        assert_eq!(st.overlay_phase(), OverlayPhase::Open(MemberId(1)));
        assert_eq!(st.document().overlay().full_name, "Anil Patel");
        assert_eq!(st.document().overlay().position, "Chair");
        assert!(st.document().body_scroll_locked());
    });
}

#[tokio::test(start_paused = true)]
async fn unknown_member_leaves_document_untouched() {
    let page = page_with(PAYLOAD, "2020").await;
    let before = page.snapshot().mutation_count();

    assert!(!page.open_overlay(MemberId(999)));
    assert_eq!(page.snapshot().mutation_count(), before);
}

#[tokio::test(start_paused = true)]
async fn close_button_then_fallback_unlocks_scroll() {
    let page = page_with(PAYLOAD, "2020").await;
    page.open_overlay(MemberId(1));

    page.dispatch(PageEvent::click(ids::OVERLAY_CLOSE));
    page.with_state(|st| {
        assert_eq!(st.overlay_phase(), OverlayPhase::Closing);
        assert!(st.document().body_scroll_locked());
        assert!(!st.document().has_class(ids::OVERLAY, classes::ACTIVE_OVERLAY));
    });

    tokio::time::sleep(Duration::from_millis(310)).await;
    page.with_state(|st| {
        assert_eq!(st.overlay_phase(), OverlayPhase::Closed);
        assert!(!st.document().body_scroll_locked());
    });
}

#[tokio::test(start_paused = true)]
async fn transition_end_wins_over_fallback() {
    let page = page_with(PAYLOAD, "2020").await;
    page.open_overlay(MemberId(1));
    page.close_overlay();

    page.dispatch(PageEvent::TransitionEnd {
        target: ElementId::new(ids::OVERLAY),
    });
    assert!(!page.with_state(|st| st.document().body_scroll_locked()));

    // A re-open before the fallback fires must stay locked.
    page.open_overlay(MemberId(2));
    tokio::time::sleep(Duration::from_millis(400)).await;
    page.with_state(|st| {
        assert_eq!(st.overlay_phase(), OverlayPhase::Open(MemberId(2)));
        assert!(st.document().body_scroll_locked());
    });
}

#[tokio::test(start_paused = true)]
async fn escape_blurs_and_closes() {
    let page = page_with(PAYLOAD, "2020").await;
    page.open_overlay(MemberId(1));
    page.dispatch(PageEvent::FocusIn {
        target: ElementId::new(ids::SEARCH_INPUT),
    });

    page.dispatch(PageEvent::key("Escape"));
    page.with_state(|st| {
        assert_eq!(st.overlay_phase(), OverlayPhase::Closing);
        assert!(st.document().active_element().is_none());
    });

    // Escape with nothing open only blurs.
    tokio::time::sleep(Duration::from_millis(310)).await;
    page.dispatch(PageEvent::key("Escape"));
    assert_eq!(page.with_state(|st| st.overlay_phase()), OverlayPhase::Closed);
}

#[tokio::test(start_paused = true)]
async fn overlay_image_reveals_once() {
    let page = page_with(PAYLOAD, "2015").await;
    page.open_overlay(MemberId(2));
    assert!(page.with_state(|st| st.document().overlay().image.as_ref().is_some_and(|i| i.is_armed())));

    page.dispatch(PageEvent::Image {
        container: ElementId::new(ids::OVERLAY),
        member: MemberId(2),
        outcome: ImageOutcome::Failed,
    });
    page.with_state(|st| {
        let img = st.document().overlay().image.clone().expect("image");
        assert!(img.is_revealed());
        assert_eq!(img.src, default_pic());
    });

    page.dispatch(PageEvent::Image {
        container: ElementId::new("board-members"),
        member: MemberId(2),
        outcome: ImageOutcome::Loaded,
    });
    page.with_state(|st| {
        let card = st.document().cards("board-members").next().expect("card");
        assert!(card.image.is_revealed());
        assert_eq!(card.image.src, "pics/anita.jpg");
        assert!(st.document().has_listener("board-members", EventKind::Click, roster_page::dom::Handler::OpenOverlay));
    });
}

fn default_pic() -> String {
    RosterConfig::default().assets.default_profile_pic
}
