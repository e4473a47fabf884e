use serde::{Deserialize, Serialize};
use crate::entities::id::{one_or_many, EntityId};

/// Poster work. Credited to exactly one designer.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: EntityId,
    pub designer_name: String,
    #[serde(default)]
    pub post_name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub client_description: String,
    #[serde(default)]
    pub sub_description: String,
    #[serde(default)]
    pub poster_thumb: String,
    #[serde(default)]
    pub poster_file: String,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct StillCut {
    #[serde(rename = "img", deserialize_with = "one_or_many")]
    pub images: Vec<String>,
    #[serde(rename = "desc", default)]
    pub caption: String,
}

/// Video work. May credit several designers; the first one owns the assets.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: EntityId,
    #[serde(deserialize_with = "one_or_many")]
    pub designer_name: Vec<String>,
    #[serde(default)]
    pub post_name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub client_description: String,
    #[serde(default)]
    pub video_description: String,
    #[serde(rename = "vimeoId", default)]
    pub video_locator: String,
    #[serde(alias = "thumbnail", default)]
    pub video_thumb: String,
    #[serde(default)]
    pub still_cuts: Vec<StillCut>,
}

impl Video {
    pub fn primary_designer(&self) -> Option<&str> {
        self.designer_name.first().map(|x| x.as_str())
    }

    pub fn credits(&self, designer_name: &str) -> bool {
        self.designer_name.iter().any(|x| x == designer_name)
    }
}

/// Collaborative (TVCF) work.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: EntityId,
    pub team_members: Vec<String>,
    #[serde(default)]
    pub team_name: String,
    #[serde(rename = "teamtitle", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "teamfolder", default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default)]
    pub client: String,
    #[serde(rename = "teamSubTitle", default)]
    pub subtitle: String,
    #[serde(default)]
    pub video_name: String,
    #[serde(default)]
    pub team_thumbnail: String,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub video: String,
    #[serde(rename = "storyBord", default)]
    pub storyboard: Vec<String>,
    #[serde(rename = "memoRise", default)]
    pub memorise: Vec<String>,
    #[serde(rename = "m-inner-text", default)]
    pub memorise_overlays: Vec<String>,
    #[serde(rename = "membersImg", default, skip_serializing_if = "Option::is_none")]
    pub members_image: Option<String>,
    #[serde(rename = "teamPPMNote", default)]
    pub production_notes: Vec<String>,
    #[serde(rename = "v-text", default, skip_serializing_if = "Option::is_none")]
    pub video_caption: Option<String>,
    #[serde(rename = "s-text", default, skip_serializing_if = "Option::is_none")]
    pub storyboard_caption: Option<String>,
    #[serde(rename = "m-text", default, skip_serializing_if = "Option::is_none")]
    pub memorise_caption: Option<String>,
    #[serde(rename = "ppt-text", default, skip_serializing_if = "Option::is_none")]
    pub production_notes_caption: Option<String>,
}

impl Team {
    /// Folder holding the team's assets: `teamfolder` when set, the team name otherwise.
    pub fn asset_folder(&self) -> &str {
        match self.folder.as_deref() {
            Some(folder) if !folder.is_empty() => folder,
            _ => &self.team_name,
        }
    }

    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &self.team_name,
        }
    }

    pub fn has_member(&self, designer_name: &str) -> bool {
        self.team_members.iter().any(|x| x == designer_name)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkKind {
    Post,
    Video,
    Team,
}

impl WorkKind {
    pub fn label(&self) -> &'static str {
        match self {
            WorkKind::Post => "포스터",
            WorkKind::Video => "비디오",
            WorkKind::Team => "TVCF",
        }
    }
}

/// One entry of a designer's portfolio.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Work<'a> {
    Post(&'a Post),
    Video(&'a Video),
    Team(&'a Team),
}

impl<'a> Work<'a> {
    pub fn kind(&self) -> WorkKind {
        match self {
            Work::Post(_) => WorkKind::Post,
            Work::Video(_) => WorkKind::Video,
            Work::Team(_) => WorkKind::Team,
        }
    }

    pub fn id(&self) -> &'a EntityId {
        match self {
            Work::Post(x) => &x.id,
            Work::Video(x) => &x.id,
            Work::Team(x) => &x.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            Work::Post(x) => &x.post_name,
            Work::Video(x) => &x.post_name,
            Work::Team(x) => &x.video_name,
        }
    }

    /// Designer names this work is credited to.
    pub fn credits(&self) -> Vec<&'a str> {
        match self {
            Work::Post(x) => vec![x.designer_name.as_str()],
            Work::Video(x) => x.designer_name.iter().map(|x| x.as_str()).collect(),
            Work::Team(x) => x.team_members.iter().map(|x| x.as_str()).collect(),
        }
    }
}
