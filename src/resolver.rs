//! Lookups over one year's [`Dataset`].
//!
//! Every foreign key is a bare designer name compared by string equality. Nothing here
//! fails: a key that matches nothing yields `None` or an empty list.

use std::fmt::Display;
use crate::entities::{Dataset, Designer, Post, Team, Video, Work, WorkKind};

/// First designer whose name equals `name`.
pub fn resolve_designer<'a>(dataset: &'a Dataset, name: &str) -> Option<&'a Designer> {
    dataset.designers.iter().find(|x| x.name == name)
}

/// Every work credited to `designer_name`: posters, then videos, then team works,
/// each group in source order.
pub fn resolve_works_for<'a>(dataset: &'a Dataset, designer_name: &str) -> Vec<Work<'a>> {
    let posts = dataset.posts.iter()
        .filter(|x| x.designer_name == designer_name)
        .map(Work::Post);
    let videos = dataset.videos.iter()
        .filter(|x| x.credits(designer_name))
        .map(Work::Video);
    let teams = dataset.teams.iter()
        .filter(|x| x.has_member(designer_name))
        .map(Work::Team);
    posts.chain(videos).chain(teams).collect()
}

pub fn resolve_post_by_id(dataset: &Dataset, id: impl Display) -> Option<&Post> {
    let id = id.to_string();
    dataset.posts.iter().find(|x| x.id.matches(&id))
}

pub fn resolve_video_by_id(dataset: &Dataset, id: impl Display) -> Option<&Video> {
    let id = id.to_string();
    dataset.videos.iter().find(|x| x.id.matches(&id))
}

pub fn resolve_team_by_id(dataset: &Dataset, id: impl Display) -> Option<&Team> {
    let id = id.to_string();
    dataset.teams.iter().find(|x| x.id.matches(&id))
}

/// The designer a poster is credited to, if that name is in the dataset.
pub fn resolve_designer_for_post<'a>(dataset: &'a Dataset, post: &Post) -> Option<&'a Designer> {
    resolve_designer(dataset, &post.designer_name)
}

/// Team members in roster order. Names without a designer record are skipped.
pub fn resolve_designers_for_team<'a>(dataset: &'a Dataset, team: &Team) -> Vec<&'a Designer> {
    team.team_members.iter()
        .filter_map(|x| resolve_designer(dataset, x))
        .collect()
}

/// Members of a team as the team page lists them: in the order of the designers collection.
pub fn resolve_team_members<'a>(dataset: &'a Dataset, team: &Team) -> Vec<&'a Designer> {
    designers_in_membership(dataset, &team.team_members)
}

/// Credited designers of a video, in the order of the designers collection.
pub fn resolve_designers_for_video<'a>(dataset: &'a Dataset, video: &Video) -> Vec<&'a Designer> {
    designers_in_membership(dataset, &video.designer_name)
}

/// Designers whose name appears in `members`, in the order of the designers collection.
pub fn designers_in_membership<'a>(dataset: &'a Dataset, members: &[String]) -> Vec<&'a Designer> {
    dataset.designers.iter()
        .filter(|x| members.contains(&x.name))
        .collect()
}

/// All works of one kind in source order, as shown on a works tab.
pub fn works_of_kind(dataset: &Dataset, kind: WorkKind) -> Vec<Work<'_>> {
    match kind {
        WorkKind::Post => dataset.posts.iter().map(Work::Post).collect(),
        WorkKind::Video => dataset.videos.iter().map(Work::Video).collect(),
        WorkKind::Team => dataset.teams.iter().map(Work::Team).collect(),
    }
}
