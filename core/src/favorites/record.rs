// Favorite tutor record

use serde::{Deserialize, Serialize};

/// A tutor profile the user has marked as a favorite.
///
/// Field names on the wire match what the mobile app has always written,
/// so `contact_handle` travels as `whatsapp`. Identity is the `id` alone:
/// two records with the same id are the same favorite even if the profile
/// text has since changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: u64,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub cost: f64,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "whatsapp", alias = "contactHandle", default)]
    pub contact_handle: String,
}

impl FavoriteRecord {
    pub fn new(id: u64, name: String) -> Self {
        Self {
            id,
            avatar: String::new(),
            bio: String::new(),
            cost: 0.0,
            name,
            subject: String::new(),
            contact_handle: String::new(),
        }
    }

    pub fn with_subject(mut self, subject: String) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_bio(mut self, bio: String) -> Self {
        self.bio = bio;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_avatar(mut self, avatar: String) -> Self {
        self.avatar = avatar;
        self
    }

    pub fn with_contact_handle(mut self, handle: String) -> Self {
        self.contact_handle = handle;
        self
    }

    /// Field-by-field comparison, unlike `==` which only looks at `id`
    pub fn same_profile(&self, other: &Self) -> bool {
        self.id == other.id
            && self.avatar == other.avatar
            && self.bio == other.bio
            && self.cost.to_bits() == other.cost.to_bits()
            && self.name == other.name
            && self.subject == other.subject
            && self.contact_handle == other.contact_handle
    }
}

impl PartialEq for FavoriteRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FavoriteRecord {}
