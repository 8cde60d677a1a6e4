//! The state behind the gallery view.
//
// `Gallery` turns user actions into store calls and keeps the derived state
// the view draws from: the photos in display order, the group filter and the
// photo open in the viewer. Drawing it is left to the front end.

use std::iter;

use camino::{Utf8Path, Utf8PathBuf};
use entity::photo;

mod filter;

pub use filter::GroupFilter;

use crate::data::{NewPhoto, PhotoStore, PhotoUpdate};
use crate::error::{Result, StoreError};
use crate::export::{self, ExportError};

/// Where a captured image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Paste,
    Drop,
    ClipboardRead,
}

#[derive(Debug)]
pub struct Gallery<'s> {
    store: &'s PhotoStore,
    // Most recent first
    photos: Vec<photo::Model>,
    // Sorted, as the store reports them
    groups: Vec<String>,
    filter: GroupFilter,
    selected: Option<i64>,
}

impl<'s> Gallery<'s> {
    pub fn new(store: &'s PhotoStore) -> Self {
        Self {
            store,
            photos: vec![],
            groups: vec![],
            filter: GroupFilter::default(),
            selected: None,
        }
    }

    pub async fn load(store: &'s PhotoStore) -> Result<Self> {
        let mut gallery = Self::new(store);
        gallery.refresh().await?;
        Ok(gallery)
    }

    /// Reload every photo from the store.
    #[tracing::instrument(name = "Refreshing gallery", skip(self))]
    pub async fn refresh(&mut self) -> Result<()> {
        let mut photos = self.store.list_all().await?;
        photos.reverse();
        self.photos = photos;
        self.groups = self.store.groups().await?;

        if let GroupFilter::Group(group) = &self.filter {
            if !self.groups.contains(group) {
                tracing::debug!("Group {group} is empty, showing all photos");
                self.filter = GroupFilter::All;
            }
        }
        self.tidy_selection();
        Ok(())
    }

    pub fn photos(&self) -> &[photo::Model] {
        &self.photos
    }

    /// The photos passing the current filter, most recent first.
    pub fn visible(&self) -> impl Iterator<Item = &photo::Model> + '_ {
        self.photos.iter().filter(|p| self.filter.filter(p))
    }

    /// `All` followed by every group in use, sorted.
    pub fn groups(&self) -> Vec<GroupFilter> {
        iter::once(GroupFilter::All)
            .chain(self.groups.iter().map(|g| GroupFilter::from(g.as_str())))
            .collect()
    }

    pub fn filter(&self) -> &GroupFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: GroupFilter) {
        self.filter = filter;
        self.tidy_selection();
    }

    /// Save a captured image and show it.
    #[tracing::instrument(name = "Capturing photo", skip(self, photo))]
    pub async fn capture(&mut self, source: CaptureSource, photo: NewPhoto) -> Result<i64> {
        let id = self.store.create(photo).await?;
        tracing::info!("Captured photo {id} from {source:?}");
        self.refresh().await?;
        Ok(id)
    }

    pub async fn rename(&mut self, id: i64, name: &str) -> Result<()> {
        self.apply(id, PhotoUpdate::name(name)).await
    }

    pub async fn set_caption(&mut self, id: i64, caption: Option<String>) -> Result<()> {
        self.apply(id, PhotoUpdate::caption(caption)).await
    }

    pub async fn set_group(&mut self, id: i64, group: Option<String>) -> Result<()> {
        self.apply(id, PhotoUpdate::group(group)).await
    }

    pub async fn apply(&mut self, id: i64, changes: PhotoUpdate) -> Result<()> {
        let result = self.store.update(id, changes).await;
        self.settle(id, result).await
    }

    pub async fn delete(&mut self, id: i64) -> Result<()> {
        let result = self.store.delete(id).await;
        self.settle(id, result).await
    }

    /// A photo that has already gone is not an error here, the listing is
    /// refreshed either way.
    async fn settle(&mut self, id: i64, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => tracing::warn!("Photo {id} is already gone"),
            Err(e) => return Err(e),
        }
        self.refresh().await
    }

    pub async fn export(
        &self,
        id: i64,
        directory: &Utf8Path,
    ) -> Result<Utf8PathBuf, ExportError> {
        let photo = self.store.get(id).await?;
        export::export_photo(&photo, directory).await
    }

    /// Open a visible photo in the viewer.
    pub fn select(&mut self, id: i64) -> bool {
        let found = self.visible().any(|p| p.id == id);
        if found {
            self.selected = Some(id);
        }
        found
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&photo::Model> {
        let id = self.selected?;
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn next(&mut self) -> Option<&photo::Model> {
        self.step(1)
    }

    pub fn prev(&mut self) -> Option<&photo::Model> {
        self.step(-1)
    }

    // Wraps around at both ends
    fn step(&mut self, direction: isize) -> Option<&photo::Model> {
        let visible: Vec<i64> = self.visible().map(|p| p.id).collect();
        let current = visible.iter().position(|&id| Some(id) == self.selected)?;
        let next = (current as isize + direction).rem_euclid(visible.len() as isize);
        self.selected = Some(visible[next as usize]);
        self.selected()
    }

    fn tidy_selection(&mut self) {
        if let Some(id) = self.selected {
            if !self.visible().any(|p| p.id == id) {
                self.selected = None;
            }
        }
    }
}
