//! Page-ready projections of dataset records, with asset locators filled in.

use serde::Serialize;
use crate::assets::AssetLocator;
use crate::entities::{Designer, EntityId, Post, StillCut, Team, Video, Work, WorkKind, Year};
use crate::utils::str_utils::StringExtensions;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DesignerCard {
    pub name: String,
    pub profile_image: Option<String>,
}

impl DesignerCard {
    pub fn create(designer: &Designer, year: Year, assets: &dyn AssetLocator) -> Self {
        Self {
            name: designer.name.clone(),
            profile_image: assets.designer_profile(year, &designer.name),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkCard {
    pub kind: WorkKind,
    pub id: EntityId,
    pub category: &'static str,
    pub title: String,
    pub subtitle: String,
    pub thumbnail: Option<String>,
}

impl WorkCard {
    pub fn create(work: Work<'_>, year: Year, assets: &dyn AssetLocator) -> Self {
        let (subtitle, thumbnail) = match work {
            Work::Post(x) => (x.designer_name.clone(), assets.poster_image(year, x, &x.poster_thumb)),
            Work::Video(x) => (x.designer_name.join(", "), assets.video_image(year, x, &x.video_thumb)),
            Work::Team(x) => (x.team_name.clone(), assets.team_image(year, x, &x.team_thumbnail)),
        };
        Self {
            kind: work.kind(),
            id: work.id().clone(),
            category: work.kind().label(),
            title: work.title().to_string(),
            subtitle,
            thumbnail,
        }
    }
}

/// Target of a previous/next arrow.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkLink {
    pub id: EntityId,
    pub title: String,
}

impl WorkLink {
    pub fn create(work: Work<'_>) -> Self {
        Self { id: work.id().clone(), title: work.title().to_string() }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DesignerPage {
    pub year: Year,
    pub designer: Designer,
    pub profile_image: Option<String>,
    pub works: Vec<WorkCard>,
    pub previous: Option<DesignerCard>,
    pub next: Option<DesignerCard>,
    pub neighbours: Vec<DesignerCard>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub year: Year,
    pub post: Post,
    pub designer: Option<DesignerCard>,
    pub thumbnail: Option<String>,
    pub poster_image: Option<String>,
    pub previous: Option<WorkLink>,
    pub next: Option<WorkLink>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StillCutView {
    pub images: Vec<Option<String>>,
    pub caption: Vec<String>,
}

impl StillCutView {
    pub fn create(cut: &StillCut, video: &Video, year: Year, assets: &dyn AssetLocator) -> Self {
        Self {
            images: cut.images.iter().map(|x| assets.video_image(year, video, x)).collect(),
            caption: cut.caption.text_lines(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoPage {
    pub year: Year,
    pub video: Video,
    pub designers: Vec<DesignerCard>,
    pub embed_url: String,
    pub thumbnail: Option<String>,
    pub still_cuts: Vec<StillCutView>,
    pub previous: Option<WorkLink>,
    pub next: Option<WorkLink>,
}

/// One frame of a team slideshow, with its optional overlay caption.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamPage {
    pub year: Year,
    pub team: Team,
    pub title: String,
    /// Member cards, in the order of the designers collection.
    pub members: Vec<DesignerCard>,
    /// Credit line, in the order the team lists its members.
    pub roster: Vec<DesignerCard>,
    pub main_image: Option<String>,
    pub embed_url: String,
    pub storyboard: Vec<Frame>,
    pub memorise: Vec<Frame>,
    pub members_image: Option<String>,
    pub production_notes: Vec<Frame>,
    pub previous: Option<WorkLink>,
    pub next: Option<WorkLink>,
}

pub fn team_frames(team: &Team, images: &[String], overlays: &[String], year: Year, assets: &dyn AssetLocator) -> Vec<Frame> {
    images.iter()
        .enumerate()
        .map(|(index, image)| Frame {
            image: assets.team_image(year, team, image),
            overlay: overlays.get(index).filter(|x| !x.trim().is_empty()).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::BucketAssetLocator;

    const YEAR: Year = Year::new(2025);

    #[test]
    fn test_work_card_for_each_kind() {
        let assets = BucketAssetLocator::new("https://cdn.example/o/");
        let post = Post { id: "1".into(), designer_name: "kim".into(), post_name: "p".into(), poster_thumb: "t.jpg".into(), ..Default::default() };
        let card = WorkCard::create(Work::Post(&post), YEAR, &assets);
        assert_eq!(card.category, "포스터");
        assert_eq!(card.subtitle, "kim");
        assert!(card.thumbnail.unwrap().contains("UsersWorkData%2Fkim%2Ft.jpg"));

        let video = Video { id: "2".into(), designer_name: vec!["kim".into(), "lee".into()], ..Default::default() };
        let card = WorkCard::create(Work::Video(&video), YEAR, &assets);
        assert_eq!(card.subtitle, "kim, lee");
        assert!(card.thumbnail.is_none());

        let team = Team { id: "3".into(), team_name: "A".into(), video_name: "ad".into(), ..Default::default() };
        let card = WorkCard::create(Work::Team(&team), YEAR, &assets);
        assert_eq!(card.kind, WorkKind::Team);
        assert_eq!(card.title, "ad");
        assert_eq!(card.subtitle, "A");
    }

    #[test]
    fn test_team_frames_pair_overlays() {
        let assets = BucketAssetLocator::new("https://cdn.example/o/");
        let team = Team { team_name: "A".into(), ..Default::default() };
        let frames = team_frames(&team, &["1.jpg".to_string(), "2.jpg".to_string()], &["first".to_string()], YEAR, &assets);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].overlay.as_deref(), Some("first"));
        assert!(frames[1].overlay.is_none());
        assert!(frames[1].image.as_ref().unwrap().contains("TeamWorkData%2FA%2F2.jpg"));
    }
}
