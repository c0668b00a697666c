//! Anchor-based row selection.
//!
//! The selection is an immutable set of row keys plus an anchor: the row most
//! recently picked with a plain or ctrl click, used as the fixed end of shift
//! range operations. Ordering and range resolution come from the caller
//! through [`RowOrder`], so the model works over any sorted/filtered view.

use std::hash::Hash;

use crate::immutable_set::ImmutableSet;
use crate::row_model::RowModel;
use crate::types::{RowSelectionMode, SelectionModes};

/// View order of row keys, supplied by the table.
pub trait RowOrder<K> {
    /// Keys from `from` to `to` inclusive, in view order. Empty if either key
    /// is not in the view.
    fn between(&self, from: &K, to: &K) -> Vec<K>;
    /// The key `delta` places away from `key`, if any.
    fn offset(&self, key: &K, delta: isize) -> Option<K>;
}

impl RowOrder<usize> for RowModel {
    fn between(&self, from: &usize, to: &usize) -> Vec<usize> {
        RowModel::between(self, *from, *to)
    }

    fn offset(&self, key: &usize, delta: isize) -> Option<usize> {
        RowModel::offset(self, *key, delta)
    }
}

/// Modifier keys held during a pointer-down, as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
    pub alt: bool,
}

/// Platform capability flag, resolved once at startup.
///
/// On Mac-class platforms the multi-select modifier is Cmd, so the roles of
/// the ctrl and meta keys are swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platform {
    pub mac: bool,
}

impl Platform {
    /// Classify a `navigator.platform`-style string.
    pub fn from_platform_name(name: &str) -> Self {
        Self {
            mac: name.to_ascii_lowercase().starts_with("mac"),
        }
    }

    /// Map raw modifiers to their selection roles.
    pub fn selection_modifiers(self, raw: Modifiers) -> Modifiers {
        if self.mac {
            Modifiers {
                ctrl: raw.meta,
                meta: raw.ctrl,
                ..raw
            }
        } else {
            raw
        }
    }
}

/// Keys the row keyboard handler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    Escape,
    Space,
    Enter,
    ArrowUp,
    ArrowDown,
    Other,
}

impl RowKey {
    /// Parse a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Self {
        match key {
            "Escape" => Self::Escape,
            " " => Self::Space,
            "Enter" => Self::Enter,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            _ => Self::Other,
        }
    }
}

/// Side effect the caller must carry out after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction<K> {
    /// Move focus out of the row grid entirely
    EscapeFocus,
    /// Move focus to this row
    FocusRow(K),
    /// Open the editor on the first editable cell of this row
    EnterEdit(K),
}

/// Result of a key press on a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome<K> {
    /// The event was consumed (the caller should prevent its default)
    pub handled: bool,
    pub action: Option<KeyAction<K>>,
}

impl<K> KeyOutcome<K> {
    fn ignored() -> Self {
        Self {
            handled: false,
            action: None,
        }
    }

    fn consumed(action: Option<KeyAction<K>>) -> Self {
        Self {
            handled: true,
            action,
        }
    }
}

/// New selection computed for a pointer-down.
#[derive(Debug, Clone)]
pub struct PointerOutcome<K> {
    pub selection: ImmutableSet<K>,
    /// The clicked row becomes the anchor
    pub set_anchor: bool,
}

/// Resolve a pointer-down on row `key`.
///
/// `mods` are already mapped through [`Platform::selection_modifiers`].
/// Returns `None` when the click has no selection effect.
pub fn resolve_pointer_down<K, O>(
    mode: RowSelectionMode,
    selected: &ImmutableSet<K>,
    anchor: Option<&K>,
    key: &K,
    mods: Modifiers,
    order: &O,
) -> Option<PointerOutcome<K>>
where
    K: Eq + Hash + Clone,
    O: RowOrder<K> + ?Sized,
{
    if mods.meta || mods.alt {
        return None;
    }

    let with_anchor = |selection| {
        Some(PointerOutcome {
            selection,
            set_anchor: true,
        })
    };
    let keep_anchor = |selection| {
        Some(PointerOutcome {
            selection,
            set_anchor: false,
        })
    };

    match mode {
        RowSelectionMode::None => None,
        RowSelectionMode::Single => {
            if mods.ctrl && !mods.shift && selected.has(key) {
                with_anchor(ImmutableSet::empty())
            } else {
                with_anchor(ImmutableSet::just([key.clone()]))
            }
        }
        RowSelectionMode::Multiple => match (mods.ctrl, mods.shift) {
            (true, true) => {
                let anchor = anchor?;
                keep_anchor(selected.add(order.between(anchor, key)))
            }
            (true, false) => with_anchor(selected.toggle(key)),
            (false, true) => {
                let anchor = anchor?;
                keep_anchor(ImmutableSet::just(order.between(anchor, key)))
            }
            (false, false) => with_anchor(ImmutableSet::just([key.clone()])),
        },
    }
}

/// Selected row keys and the range anchor.
#[derive(Debug, Clone)]
pub struct SelectionState<K> {
    selected: ImmutableSet<K>,
    anchor: Option<K>,
    version: u64,
}

impl<K> Default for SelectionState<K> {
    fn default() -> Self {
        Self {
            selected: ImmutableSet::empty(),
            anchor: None,
            version: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> SelectionState<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &K) -> bool {
        self.selected.has(key)
    }

    pub fn keys(&self) -> &ImmutableSet<K> {
        &self.selected
    }

    pub fn anchor(&self) -> Option<&K> {
        self.anchor.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set(&mut self, key: K, selected: bool) {
        let next = if selected {
            self.selected.add([key])
        } else {
            self.selected.delete(&key)
        };
        self.replace(next);
    }

    /// Replace the selection with exactly `keys`.
    pub fn set_multiple<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        self.replace(ImmutableSet::just(keys));
    }

    pub fn clear(&mut self) {
        self.replace(self.selected.clear());
    }

    /// Drop selection and anchor (dataset replaced).
    pub fn reset(&mut self) {
        self.anchor = None;
        self.replace(ImmutableSet::empty());
    }

    fn replace(&mut self, next: ImmutableSet<K>) {
        self.selected = next;
        self.version = self.version.wrapping_add(1);
    }

    /// Handle a pointer-down on a row. Returns true if the selection changed
    /// and the caller should focus the row and prevent the default action.
    ///
    /// `row_is_editing` suppresses selection while the clicked row hosts the
    /// cell being edited.
    pub fn pointer_down<O: RowOrder<K> + ?Sized>(
        &mut self,
        modes: &SelectionModes,
        key: &K,
        mods: Modifiers,
        platform: Platform,
        row_is_editing: bool,
        order: &O,
    ) -> bool {
        if modes.is_none() || row_is_editing {
            return false;
        }
        let mods = platform.selection_modifiers(mods);
        let Some(outcome) = resolve_pointer_down(
            modes.row,
            &self.selected,
            self.anchor.as_ref(),
            key,
            mods,
            order,
        ) else {
            return false;
        };
        self.replace(outcome.selection);
        if outcome.set_anchor {
            self.anchor = Some(key.clone());
        }
        true
    }

    /// Handle a key press on a focused row.
    ///
    /// Nothing happens while any cell is being edited.
    pub fn key_down<O: RowOrder<K> + ?Sized>(
        &mut self,
        modes: &SelectionModes,
        key: &K,
        pressed: RowKey,
        editing_any: bool,
        edit_allowed: bool,
        order: &O,
    ) -> KeyOutcome<K> {
        if editing_any || modes.is_none() {
            return KeyOutcome::ignored();
        }

        if pressed == RowKey::Escape {
            return KeyOutcome::consumed(Some(KeyAction::EscapeFocus));
        }

        let selected = self.selected.has(key);

        match (modes.row, pressed) {
            (RowSelectionMode::Single | RowSelectionMode::Multiple, RowKey::Enter)
                if edit_allowed =>
            {
                KeyOutcome::consumed(Some(KeyAction::EnterEdit(key.clone())))
            }
            (RowSelectionMode::Single, RowKey::Space | RowKey::Enter) => {
                let next = if selected {
                    ImmutableSet::empty()
                } else {
                    ImmutableSet::just([key.clone()])
                };
                self.replace(next);
                KeyOutcome::consumed(None)
            }
            (RowSelectionMode::Multiple, RowKey::Space | RowKey::Enter) => {
                self.replace(self.selected.toggle(key));
                KeyOutcome::consumed(None)
            }
            (RowSelectionMode::Single, RowKey::ArrowUp | RowKey::ArrowDown) => {
                let Some(target) = order.offset(key, arrow_delta(pressed)) else {
                    return KeyOutcome::ignored();
                };
                if selected {
                    self.replace(ImmutableSet::just([target.clone()]));
                }
                KeyOutcome::consumed(Some(KeyAction::FocusRow(target)))
            }
            (RowSelectionMode::Multiple, RowKey::ArrowUp | RowKey::ArrowDown) => {
                match order.offset(key, arrow_delta(pressed)) {
                    Some(target) => KeyOutcome::consumed(Some(KeyAction::FocusRow(target))),
                    None => KeyOutcome::ignored(),
                }
            }
            _ => KeyOutcome::ignored(),
        }
    }
}

fn arrow_delta(key: RowKey) -> isize {
    if key == RowKey::ArrowUp {
        -1
    } else {
        1
    }
}
