//! Detail overlay.
//!
//! One overlay is reused for every member. Its lifecycle is
//! `Closed → Open(id) → Closing → Closed`, with `Closing → Open(id)` when a
//! card is clicked again before the closing transition finishes. Body scroll is
//! locked while open and released only when a close actually completes.

use tracing::{debug, info};

use roster_core::display::MemberCard;
use roster_core::store::MemberStore;
use roster_core::types::MemberId;

use crate::dom::{classes, ids, Document, Image, OverlayContent};
use crate::listeners::{slots, ListenerRegistry, Section};

/// Where the overlay is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    /// Hidden; body scroll free.
    #[default]
    Closed,
    /// Showing a member; body scroll locked.
    Open(MemberId),
    /// Hiding; body scroll still locked until the transition ends.
    Closing,
}

/// Drives the overlay through its phases.
#[derive(Debug, Default)]
pub struct OverlayController {
    phase: OverlayPhase,
}

impl OverlayController {
    /// A closed overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Whether a member is being shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.phase, OverlayPhase::Open(_))
    }

    /// Show `id`. Unknown ids leave the document untouched and return `false`.
    pub fn open(
        &mut self,
        store: &MemberStore,
        doc: &mut Document,
        listeners: &mut ListenerRegistry,
        default_pic: &str,
        id: MemberId,
    ) -> bool {
        let Some(member) = store.get(id) else {
            debug!(%id, "Overlay requested for unknown member");
            return false;
        };

        let card = MemberCard::from_member(member, default_pic);
        doc.set_overlay(OverlayContent {
            member_id: Some(id),
            image: Some(Image::lazy(card.img_src, card.full_name.clone(), default_pic)),
            full_name: card.full_name,
            position: card.position,
            year_range: card.year_range,
        });
        doc.set_scroll_top(ids::OVERLAY, 0);
        doc.set_body_scroll_locked(true);
        doc.add_class(ids::OVERLAY, classes::ACTIVE_OVERLAY);

        if self.phase == OverlayPhase::Closing {
            listeners.set_listener(doc, Section::Overlay, slots::OVERLAY_TRANSITION, false);
        }
        listeners.set_listener(doc, Section::Overlay, slots::OVERLAY_CLOSE, true);

        self.phase = OverlayPhase::Open(id);
        info!(%id, "Overlay opened");
        true
    }

    /// Start hiding the overlay. Returns `true` if a close began; the caller
    /// is responsible for scheduling the fallback that calls
    /// [`OverlayController::finish_close`].
    pub fn close(&mut self, doc: &mut Document, listeners: &mut ListenerRegistry) -> bool {
        if !self.is_open() {
            return false;
        }
        doc.remove_class(ids::OVERLAY, classes::ACTIVE_OVERLAY);
        listeners.set_listener(doc, Section::Overlay, slots::OVERLAY_CLOSE, false);
        listeners.set_listener(doc, Section::Overlay, slots::OVERLAY_TRANSITION, true);
        self.phase = OverlayPhase::Closing;
        debug!("Overlay closing");
        true
    }

    /// Complete a close: release body scroll and go to `Closed`. Only the
    /// first of transition-end and fallback does anything.
    pub fn finish_close(&mut self, doc: &mut Document, listeners: &mut ListenerRegistry) -> bool {
        if self.phase != OverlayPhase::Closing {
            return false;
        }
        doc.set_body_scroll_locked(false);
        listeners.set_listener(doc, Section::Overlay, slots::OVERLAY_TRANSITION, false);
        self.phase = OverlayPhase::Closed;
        debug!("Overlay closed");
        true
    }
}
