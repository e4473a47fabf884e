use crate::entities::{Post, Team, Video, Year};

pub const DEFAULT_ASSET_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0/b/jvisiondesign-web.firebasestorage.app/o/";

/// Turns (year, owner folder, file) into a retrievable locator.
///
/// `None` means one of the parts is missing and the caller should show a placeholder.
pub trait AssetLocator: Send + Sync {
    fn asset_url(&self, year: Year, owner_folder: &str, filename: &str) -> Option<String>;

    fn designer_profile(&self, year: Year, designer_name: &str) -> Option<String>;

    fn team_asset(&self, year: Year, team_folder: &str, filename: &str) -> Option<String>;

    fn poster_image(&self, year: Year, post: &Post, filename: &str) -> Option<String> {
        self.asset_url(year, &post.designer_name, filename)
    }

    fn video_image(&self, year: Year, video: &Video, filename: &str) -> Option<String> {
        let owner = video.primary_designer()?;
        self.asset_url(year, owner, &format!("VideoSorce/{}", non_empty(filename)?))
    }

    fn team_image(&self, year: Year, team: &Team, filename: &str) -> Option<String> {
        self.team_asset(year, team.asset_folder(), filename)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() { None } else { Some(value) }
}

/// Object-storage bucket layout: the whole object path is encoded as a single component.
#[derive(Debug, Clone)]
pub struct BucketAssetLocator {
    base_url: String,
}

impl BucketAssetLocator {
    pub fn new(base_url: &str) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    fn object_url(&self, object_path: &str) -> String {
        format!("{}{}?alt=media", self.base_url, urlencoding::encode(object_path))
    }
}

impl Default for BucketAssetLocator {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_BASE_URL)
    }
}

impl AssetLocator for BucketAssetLocator {
    fn asset_url(&self, year: Year, owner_folder: &str, filename: &str) -> Option<String> {
        let owner_folder = non_empty(owner_folder)?;
        let filename = non_empty(filename)?;
        Some(self.object_url(&format!("{}/UsersWorkData/{}/{}", year, owner_folder, filename)))
    }

    fn designer_profile(&self, year: Year, designer_name: &str) -> Option<String> {
        let designer_name = non_empty(designer_name)?;
        Some(self.object_url(&format!("{}/Users/{}.jpg", year, designer_name)))
    }

    fn team_asset(&self, year: Year, team_folder: &str, filename: &str) -> Option<String> {
        let team_folder = non_empty(team_folder)?;
        let filename = non_empty(filename)?;
        Some(self.object_url(&format!("{}/TeamWorkData/{}/{}", year, team_folder, filename)))
    }
}
