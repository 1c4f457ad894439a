//! In-memory theme editor.
//!
//! [`ThemeEditor`] holds a working copy (the draft) of one theme that diverges
//! from the last saved snapshot until [`ThemeEditor::save`] pushes it through a
//! [`ThemeBackend`]. Blocks are addressed by their stable [`BlockId`];
//! [`ThemeEditor::block_id_at`] bridges callers that only know a position.
//!
//! ```text
//! Clean --(any edit)--> Dirty --save--> Saving --ok--> Clean
//!                                          \---err---> Dirty
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::blocks::{Block, BlockId, BlockKind};
use crate::error::CoreError;
use crate::theme::{
    validate_theme_name, ColorRole, ReplaceTheme, StyleKey, Theme, ThemeDocument, TypographyKey,
};
use crate::types::DbId;

/// Persistence seam used by [`ThemeEditor::save`].
#[async_trait]
pub trait ThemeBackend: Send + Sync {
    type Error: std::fmt::Display + Send;

    /// Full replace of a theme's document. Returns the stored theme.
    async fn replace_theme(
        &self,
        store_id: DbId,
        theme_id: DbId,
        body: &ReplaceTheme,
    ) -> Result<Theme, Self::Error>;

    /// Make `theme_id` the store's only active theme.
    async fn activate_theme(&self, store_id: DbId, theme_id: DbId) -> Result<Theme, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Draft equals the saved snapshot.
    Clean,
    /// Draft has unsaved edits.
    Dirty,
    /// A save is in flight.
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The save was rejected; the draft is kept.
    #[error("Failed to save theme: {0}")]
    Save(String),

    /// The save succeeded but activation failed.
    #[error("Theme saved but activation failed: {0}")]
    Activate(String),
}

/// Working copy of one theme.
#[derive(Debug, Clone)]
pub struct ThemeEditor {
    saved: Theme,
    draft: ThemeDocument,
    state: EditorState,
    conflict_detection: bool,
}

impl ThemeEditor {
    /// Start editing `theme`. The draft begins as a copy of it.
    pub fn open(theme: Theme) -> Self {
        Self {
            draft: theme.document.clone(),
            saved: theme,
            state: EditorState::Clean,
            conflict_detection: false,
        }
    }

    /// Send the snapshot's version with every save so the server rejects it
    /// if someone else saved in between.
    pub fn with_conflict_detection(mut self, enabled: bool) -> Self {
        self.conflict_detection = enabled;
        self
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == EditorState::Dirty
    }

    pub fn draft(&self) -> &ThemeDocument {
        &self.draft
    }

    /// Last state confirmed by the backend.
    pub fn saved(&self) -> &Theme {
        &self.saved
    }

    fn touch(&mut self) {
        self.state = EditorState::Dirty;
    }

    // ---- Document fields ----

    pub fn rename(&mut self, name: &str) -> Result<(), CoreError> {
        validate_theme_name(name)?;
        self.draft.name = name.to_string();
        self.touch();
        Ok(())
    }

    pub fn update_color(&mut self, role: ColorRole, hex: &str) -> Result<(), CoreError> {
        self.draft.colors.set(role, hex)?;
        self.touch();
        Ok(())
    }

    pub fn update_typography(&mut self, key: TypographyKey, value: &str) -> Result<(), CoreError> {
        self.draft.typography.set(key, value)?;
        self.touch();
        Ok(())
    }

    pub fn update_style(&mut self, key: StyleKey, value: &str) -> Result<(), CoreError> {
        self.draft.styles.set(key, value)?;
        self.touch();
        Ok(())
    }

    /// `None` or an empty string clears the logo.
    pub fn set_logo_url(&mut self, url: Option<&str>) {
        self.draft.logo_url = non_empty(url);
        self.touch();
    }

    pub fn set_favicon_url(&mut self, url: Option<&str>) {
        self.draft.favicon_url = non_empty(url);
        self.touch();
    }

    pub fn set_custom_css(&mut self, css: Option<&str>) {
        self.draft.custom_css = non_empty(css);
        self.touch();
    }

    // ---- Blocks ----

    /// Id of the block currently at `index`.
    pub fn block_id_at(&self, index: usize) -> Option<BlockId> {
        self.draft.blocks.get(index).map(|b| b.id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.draft.blocks.iter().find(|b| b.id == id)
    }

    fn position(&self, id: BlockId) -> Result<usize, CoreError> {
        self.draft
            .blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or(CoreError::BlockNotFound(id))
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut Block, CoreError> {
        self.draft
            .blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(CoreError::BlockNotFound(id))
    }

    /// Append an enabled block of `kind` with default config.
    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        let block = Block::new(kind);
        let id = block.id;
        self.draft.blocks.push(block);
        self.touch();
        id
    }

    /// Swap the block with its neighbour. Returns `false` (and changes
    /// nothing) when the block is already first/last.
    pub fn move_block(&mut self, id: BlockId, direction: MoveDirection) -> Result<bool, CoreError> {
        let index = self.position(id)?;
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.draft.blocks.len() => index + 1,
            _ => return Ok(false),
        };
        self.draft.blocks.swap(index, target);
        self.touch();
        Ok(true)
    }

    /// Flip `enabled`. Returns the new value.
    pub fn toggle_block(&mut self, id: BlockId) -> Result<bool, CoreError> {
        let block = self.block_mut(id)?;
        block.enabled = !block.enabled;
        let enabled = block.enabled;
        self.touch();
        Ok(enabled)
    }

    pub fn remove_block(&mut self, id: BlockId) -> Result<Block, CoreError> {
        let index = self.position(id)?;
        let removed = self.draft.blocks.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Merge `{key: value}` into the block's config.
    pub fn update_block_config(
        &mut self,
        id: BlockId,
        key: &str,
        value: Value,
    ) -> Result<(), CoreError> {
        self.block_mut(id)?.settings.merge_field(key, value)?;
        self.touch();
        Ok(())
    }

    pub fn add_list_item(&mut self, id: BlockId, key: &str) -> Result<usize, CoreError> {
        let index = self.block_mut(id)?.settings.add_list_item(key)?;
        self.touch();
        Ok(index)
    }

    pub fn update_list_item(
        &mut self,
        id: BlockId,
        key: &str,
        index: usize,
        field: &str,
        value: Value,
    ) -> Result<(), CoreError> {
        self.block_mut(id)?
            .settings
            .update_list_item(key, index, field, value)?;
        self.touch();
        Ok(())
    }

    pub fn remove_list_item(
        &mut self,
        id: BlockId,
        key: &str,
        index: usize,
    ) -> Result<Value, CoreError> {
        let removed = self.block_mut(id)?.settings.remove_list_item(key, index)?;
        self.touch();
        Ok(removed)
    }

    // ---- Lifecycle ----

    /// Drop unsaved edits.
    pub fn discard_changes(&mut self) {
        self.draft = self.saved.document.clone();
        self.state = EditorState::Clean;
    }

    /// Persist the draft as a full replace, then optionally activate.
    ///
    /// On success the backend's copy becomes both the snapshot and the new
    /// draft. If the replace fails the draft is kept and the editor returns
    /// to [`EditorState::Dirty`]. If only the activation fails the save
    /// stands and the editor is [`EditorState::Clean`].
    pub async fn save<B>(&mut self, backend: &B, and_activate: bool) -> Result<&Theme, EditorError>
    where
        B: ThemeBackend + ?Sized,
    {
        let Some(store_id) = self.saved.store_id else {
            return Err(EditorError::Save(
                "preset themes are read-only; duplicate it into a store first".to_string(),
            ));
        };
        let theme_id = self.saved.id;
        let body = ReplaceTheme {
            document: self.draft.clone(),
            expected_version: self.conflict_detection.then_some(self.saved.version),
        };

        self.state = EditorState::Saving;

        let stored = match backend.replace_theme(store_id, theme_id, &body).await {
            Ok(theme) => theme,
            Err(e) => {
                self.state = EditorState::Dirty;
                return Err(EditorError::Save(e.to_string()));
            }
        };
        self.accept(stored);

        if and_activate && !self.saved.is_active {
            let active = backend
                .activate_theme(store_id, theme_id)
                .await
                .map_err(|e| EditorError::Activate(e.to_string()))?;
            self.accept(active);
        }
        Ok(&self.saved)
    }

    fn accept(&mut self, theme: Theme) {
        self.draft = theme.document.clone();
        self.saved = theme;
        self.state = EditorState::Clean;
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use chrono::Utc;
    use serde_json::json;

    fn theme_with(blocks: &[BlockKind]) -> Theme {
        let now = Utc::now();
        Theme {
            id: 7,
            store_id: Some(1),
            is_active: false,
            is_preset: false,
            version: 3,
            document: ThemeDocument {
                name: "Summer".into(),
                blocks: blocks.iter().copied().map(Block::new).collect(),
                ..ThemeDocument::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    fn kinds(editor: &ThemeEditor) -> Vec<Option<BlockKind>> {
        editor.draft().blocks.iter().map(Block::kind).collect()
    }

    /// Backend that echoes the body back as the stored theme.
    #[derive(Default)]
    struct MockBackend {
        fail_replace: Option<String>,
        fail_activate: Option<String>,
        replaced: Mutex<Vec<ReplaceTheme>>,
        activated: Mutex<Vec<(DbId, DbId)>>,
    }

    #[async_trait]
    impl ThemeBackend for MockBackend {
        type Error = String;

        async fn replace_theme(
            &self,
            store_id: DbId,
            theme_id: DbId,
            body: &ReplaceTheme,
        ) -> Result<Theme, String> {
            if let Some(msg) = &self.fail_replace {
                return Err(msg.clone());
            }
            self.replaced.lock().unwrap().push(body.clone());
            let mut theme = theme_with(&[]);
            theme.id = theme_id;
            theme.store_id = Some(store_id);
            theme.version = 4;
            theme.document = body.document.clone();
            Ok(theme)
        }

        async fn activate_theme(&self, store_id: DbId, theme_id: DbId) -> Result<Theme, String> {
            if let Some(msg) = &self.fail_activate {
                return Err(msg.clone());
            }
            self.activated.lock().unwrap().push((store_id, theme_id));
            let replaced = self.replaced.lock().unwrap();
            let mut theme = theme_with(&[]);
            theme.id = theme_id;
            theme.is_active = true;
            theme.version = 4;
            if let Some(last) = replaced.last() {
                theme.document = last.document.clone();
            }
            Ok(theme)
        }
    }

    // ---- Block ordering ----

    #[test]
    fn move_second_block_up_swaps_with_first() {
        let mut editor = ThemeEditor::open(theme_with(&[
            BlockKind::HeroBanner,
            BlockKind::Spacer,
            BlockKind::Newsletter,
        ]));
        let spacer = editor.block_id_at(1).unwrap();

        assert!(editor.move_block(spacer, MoveDirection::Up).unwrap());
        assert_eq!(
            kinds(&editor),
            vec![
                Some(BlockKind::Spacer),
                Some(BlockKind::HeroBanner),
                Some(BlockKind::Newsletter)
            ]
        );
        assert_eq!(editor.state(), EditorState::Dirty);
    }

    #[test]
    fn move_first_up_and_last_down_are_noops() {
        let mut editor = ThemeEditor::open(theme_with(&[
            BlockKind::HeroBanner,
            BlockKind::Spacer,
            BlockKind::Newsletter,
        ]));
        let before = kinds(&editor);
        let first = editor.block_id_at(0).unwrap();
        let last = editor.block_id_at(2).unwrap();

        assert!(!editor.move_block(first, MoveDirection::Up).unwrap());
        assert!(!editor.move_block(last, MoveDirection::Down).unwrap());
        assert_eq!(kinds(&editor), before);
        assert_eq!(editor.state(), EditorState::Clean);
    }

    #[test]
    fn ids_stay_valid_after_removing_another_block() {
        let mut editor = ThemeEditor::open(theme_with(&[
            BlockKind::HeroBanner,
            BlockKind::Spacer,
            BlockKind::Newsletter,
        ]));
        let hero = editor.block_id_at(0).unwrap();
        let newsletter = editor.block_id_at(2).unwrap();

        let removed = editor.remove_block(hero).unwrap();
        assert_eq!(removed.kind(), Some(BlockKind::HeroBanner));
        assert!(!editor.toggle_block(newsletter).unwrap());
        assert!(!editor.block(newsletter).unwrap().enabled);
        assert_matches!(
            editor.toggle_block(hero),
            Err(CoreError::BlockNotFound(id)) if id == hero
        );
    }

    #[test]
    fn toggle_keeps_order() {
        let mut editor = ThemeEditor::open(theme_with(&[BlockKind::Spacer, BlockKind::Reviews]));
        let before = kinds(&editor);
        let id = editor.block_id_at(1).unwrap();
        editor.toggle_block(id).unwrap();
        assert_eq!(kinds(&editor), before);
    }

    #[test]
    fn added_trust_badges_block_has_seeded_badges() {
        let mut editor = ThemeEditor::open(theme_with(&[]));
        let id = editor.add_block(BlockKind::TrustBadges);
        let block = editor.block(id).unwrap();
        assert!(block.enabled);
        let config = block.settings.to_config_map().unwrap();
        assert_eq!(config["columns"], 3);
        assert_eq!(config["badges"].as_array().unwrap().len(), 3);
    }

    // ---- Config edits ----

    #[test]
    fn update_block_config_is_idempotent_and_keeps_other_keys() {
        let mut editor = ThemeEditor::open(theme_with(&[BlockKind::HeroBanner]));
        let id = editor.block_id_at(0).unwrap();

        editor
            .update_block_config(id, "title", json!("Big Sale"))
            .unwrap();
        let once = editor.block(id).unwrap().clone();
        editor
            .update_block_config(id, "title", json!("Big Sale"))
            .unwrap();
        assert_eq!(editor.block(id).unwrap(), &once);

        let config = once.settings.to_config_map().unwrap();
        assert_eq!(config["title"], "Big Sale");
        assert_eq!(config["cta_link"], "/products");
    }

    #[test]
    fn list_item_edits_touch_only_the_addressed_entry() {
        let mut editor = ThemeEditor::open(theme_with(&[BlockKind::TrustBadges]));
        let id = editor.block_id_at(0).unwrap();

        let index = editor.add_list_item(id, "badges").unwrap();
        assert_eq!(index, 3);
        editor
            .update_list_item(id, "badges", 3, "title", json!("Gift Wrap"))
            .unwrap();
        let removed = editor.remove_list_item(id, "badges", 0).unwrap();
        assert_eq!(removed["title"], "Free Shipping");

        let config = editor.block(id).unwrap().settings.to_config_map().unwrap();
        let titles: Vec<_> = config["badges"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, ["Secure Checkout", "Easy Returns", "Gift Wrap"]);
    }

    #[test]
    fn rejected_edit_leaves_editor_clean() {
        let mut editor = ThemeEditor::open(theme_with(&[]));
        assert!(editor.update_color(ColorRole::Primary, "blue").is_err());
        assert!(editor.rename("").is_err());
        assert_eq!(editor.state(), EditorState::Clean);
    }

    #[test]
    fn discard_restores_snapshot() {
        let mut editor = ThemeEditor::open(theme_with(&[BlockKind::Spacer]));
        editor.rename("Winter").unwrap();
        editor.add_block(BlockKind::Reviews);
        editor.discard_changes();
        assert_eq!(editor.draft(), &editor.saved().document);
        assert_eq!(editor.state(), EditorState::Clean);
    }

    // ---- Save ----

    #[tokio::test]
    async fn save_replaces_snapshot_and_cleans_state() {
        let backend = MockBackend::default();
        let mut editor = ThemeEditor::open(theme_with(&[BlockKind::Spacer]));
        editor.update_color(ColorRole::Accent, "#ff0066").unwrap();

        let saved = editor.save(&backend, false).await.unwrap();
        assert_eq!(saved.version, 4);
        assert_eq!(saved.document.colors.accent, "#ff0066");
        assert_eq!(editor.state(), EditorState::Clean);
        assert!(backend.activated.lock().unwrap().is_empty());
        assert_eq!(
            backend.replaced.lock().unwrap()[0].expected_version,
            None
        );
    }

    #[tokio::test]
    async fn save_and_activate_activates_after_replace() {
        let backend = MockBackend::default();
        let mut editor = ThemeEditor::open(theme_with(&[]));
        editor.rename("Launch").unwrap();

        let saved = editor.save(&backend, true).await.unwrap();
        assert!(saved.is_active);
        assert_eq!(saved.document.name, "Launch");
        assert_eq!(*backend.activated.lock().unwrap(), vec![(1, 7)]);
    }

    #[tokio::test]
    async fn failed_save_keeps_draft_and_returns_to_dirty() {
        let backend = MockBackend {
            fail_replace: Some("colors.primary must be a hex color".into()),
            ..MockBackend::default()
        };
        let mut editor = ThemeEditor::open(theme_with(&[]));
        editor.rename("Draft Name").unwrap();

        let err = editor.save(&backend, false).await.unwrap_err();
        assert_matches!(&err, EditorError::Save(msg) if msg.contains("hex color"));
        assert_eq!(editor.state(), EditorState::Dirty);
        assert_eq!(editor.draft().name, "Draft Name");
        assert_eq!(editor.saved().document.name, "Summer");
    }

    #[tokio::test]
    async fn failed_activation_keeps_the_save() {
        let backend = MockBackend {
            fail_activate: Some("store is locked".into()),
            ..MockBackend::default()
        };
        let mut editor = ThemeEditor::open(theme_with(&[]));
        editor.rename("Kept").unwrap();

        let err = editor.save(&backend, true).await.unwrap_err();
        assert_matches!(err, EditorError::Activate(_));
        assert_eq!(editor.state(), EditorState::Clean);
        assert_eq!(editor.saved().document.name, "Kept");
        assert!(!editor.saved().is_active);
    }

    #[tokio::test]
    async fn conflict_detection_sends_snapshot_version() {
        let backend = MockBackend::default();
        let mut editor = ThemeEditor::open(theme_with(&[])).with_conflict_detection(true);
        editor.rename("Versioned").unwrap();
        editor.save(&backend, false).await.unwrap();
        assert_eq!(
            backend.replaced.lock().unwrap()[0].expected_version,
            Some(3)
        );
    }

    #[tokio::test]
    async fn presets_cannot_be_saved() {
        let backend = MockBackend::default();
        let mut preset = theme_with(&[]);
        preset.store_id = None;
        preset.is_preset = true;
        let mut editor = ThemeEditor::open(preset);
        editor.rename("Mine").unwrap();
        assert_matches!(
            editor.save(&backend, false).await,
            Err(EditorError::Save(_))
        );
        assert!(backend.replaced.lock().unwrap().is_empty());
    }
}
