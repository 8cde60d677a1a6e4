use entity::photo;
use sea_orm::ActiveValue;
use time::OffsetDateTime;

/// A captured image waiting to be saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPhoto {
    pub blob: Vec<u8>,
    pub name: String,
    pub caption: Option<String>,
    pub group: Option<String>,
}

impl NewPhoto {
    pub fn new(blob: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        Self {
            blob: blob.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub(crate) fn into_active_model(self, created: OffsetDateTime) -> photo::ActiveModel {
        let name = match self.name.trim() {
            "" => {
                let name = default_name(local_time(created));
                tracing::debug!("No name given, using {name}");
                name
            }
            name => name.to_owned(),
        };
        photo::ActiveModel {
            id: ActiveValue::NotSet,
            blob: ActiveValue::Set(self.blob),
            name: ActiveValue::Set(name),
            caption: ActiveValue::Set(tidy(self.caption)),
            group: ActiveValue::Set(tidy(self.group)),
            timestamp: ActiveValue::Set(unix_millis(created)),
        }
    }
}

/// Changes to the descriptive fields of a saved photo.
///
/// `None` leaves a field as it is. For `caption` and `group`, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoUpdate {
    pub name: Option<String>,
    pub caption: Option<Option<String>>,
    pub group: Option<Option<String>>,
}

impl PhotoUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn caption(caption: Option<String>) -> Self {
        Self {
            caption: Some(caption),
            ..Default::default()
        }
    }

    pub fn group(group: Option<String>) -> Self {
        Self {
            group: Some(group),
            ..Default::default()
        }
    }

    /// Whether applying this would write anything. Blank names don't count.
    pub fn is_empty(&self) -> bool {
        self.caption.is_none()
            && self.group.is_none()
            && self.name.as_deref().map_or(true, |n| n.trim().is_empty())
    }

    pub(crate) fn into_active_model(self, id: i64) -> photo::ActiveModel {
        let name = self
            .name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        photo::ActiveModel {
            id: ActiveValue::Unchanged(id),
            name: name.map_or(ActiveValue::NotSet, ActiveValue::Set),
            caption: self
                .caption
                .map_or(ActiveValue::NotSet, |c| ActiveValue::Set(tidy(c))),
            group: self
                .group
                .map_or(ActiveValue::NotSet, |g| ActiveValue::Set(tidy(g))),
            ..Default::default()
        }
    }
}

/// The name given to a snap saved without one, e.g. `Snap 09:41`.
pub fn default_name(at: OffsetDateTime) -> String {
    format!("Snap {:02}:{:02}", at.hour(), at.minute())
}

fn tidy(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn local_time(at: OffsetDateTime) -> OffsetDateTime {
    // The local offset can't always be determined, e.g. on some multi-threaded
    // Unix processes.
    match time::UtcOffset::current_local_offset() {
        Ok(offset) => at.to_offset(offset),
        Err(_) => at,
    }
}

pub(crate) fn unix_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}
