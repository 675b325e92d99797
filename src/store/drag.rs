use uuid::Uuid;

/// Drag-and-drop lifecycle: `Idle -> Dragging -> OverTarget`, resolved
/// by a drop (committed) or anything else (cancelled). The session only
/// tracks which item is where; rank arithmetic lives in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: Uuid,
    },
    OverTarget {
        source: Uuid,
        target: Uuid,
    },
}

#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Pick an item up. Starting a new drag mid-drag abandons the old
    /// one, like a fresh dragstart event would.
    pub fn begin(&mut self, source: Uuid) {
        self.state = DragState::Dragging { source };
    }

    /// Hover over a potential drop target.
    pub fn hover(&mut self, target: Uuid) {
        match self.state {
            DragState::Dragging { source } | DragState::OverTarget { source, .. } => {
                self.state = DragState::OverTarget { source, target };
            }
            DragState::Idle => {}
        }
    }

    /// Leave the current drop target without releasing.
    pub fn leave(&mut self) {
        if let DragState::OverTarget { source, .. } = self.state {
            self.state = DragState::Dragging { source };
        }
    }

    /// Release. Commits to `Some((source, target))` only when hovering
    /// a target other than the dragged item itself; any other release
    /// cancels. Either way the session returns to idle.
    pub fn drop_on_target(&mut self) -> Option<(Uuid, Uuid)> {
        let resolved = match self.state {
            DragState::OverTarget { source, target } if source != target => {
                Some((source, target))
            }
            _ => None,
        };
        self.state = DragState::Idle;
        resolved
    }

    /// Abort (dragend without a drop).
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
