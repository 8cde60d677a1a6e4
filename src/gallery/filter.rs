use entity::photo;

/// Which photos the gallery shows.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum GroupFilter {
    #[default]
    All,
    Group(String),
}

impl GroupFilter {
    pub fn filter(&self, photo: &photo::Model) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Group(group) => photo.in_group(group),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GroupFilter::All => "All",
            GroupFilter::Group(group) => group,
        }
    }
}

impl From<&str> for GroupFilter {
    fn from(group: &str) -> Self {
        GroupFilter::Group(group.to_owned())
    }
}
