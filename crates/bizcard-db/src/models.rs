/// Database row types. These map directly to SQLite rows; conversion to the
/// domain models in bizcard-types happens in the directory layer.

pub struct ProfileRow {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub about: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub profile_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub theme: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct RedirectRow {
    pub old_username: String,
    pub new_username: String,
}

pub struct LinkRow {
    pub id: String,
    pub owner_id: String,
    pub platform: String,
    pub target_url: String,
    pub order_index: i64,
    pub created_at: String,
}
