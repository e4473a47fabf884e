use std::sync::Arc;
use log::{debug, info};
use crate::assets::AssetLocator;
use crate::comments::{CommentFeed, CommentSnapshot, CommentStore, CommentWatch};
use crate::config::{ExhibitionConfiguration, ExhibitionYear};
use crate::entities::{Comment, CommentDraft, Dataset, Designer, Work, WorkKind, Year};
use crate::error::ShowcaseError;
use crate::loader::DatasetLoader;
use crate::navigator::{circular_siblings, circular_window, siblings};
use crate::resolver::*;
use crate::session::PageSession;
use crate::utils::str_utils::StringExtensions;
use crate::views::*;

/// Designer carousel positions around the current designer.
const DESIGNER_NEIGHBOUR_OFFSETS: [isize; 4] = [-2, -1, 1, 2];

/// Composes the data layer into the views each page renders.
pub struct ShowcaseClient<S: CommentStore + 'static> {
    loader: DatasetLoader,
    assets: Arc<dyn AssetLocator>,
    feed: Arc<CommentFeed<S>>,
    exhibition: ExhibitionConfiguration,
}

impl<S: CommentStore + 'static> ShowcaseClient<S> {
    pub fn new(loader: DatasetLoader, assets: Arc<dyn AssetLocator>, store: S, exhibition: ExhibitionConfiguration) -> Self {
        info!("current exhibition year: {}", exhibition.current_year);
        Self {
            loader,
            assets,
            feed: Arc::new(CommentFeed::new(store)),
            exhibition,
        }
    }

    /// Year named by a request parameter, the current year when absent or unparseable.
    pub fn year_or_current(&self, raw: Option<&str>) -> Year {
        self.loader.year_or_current(raw)
    }

    pub fn years(&self) -> &[ExhibitionYear] {
        &self.exhibition.years
    }

    pub fn current_year(&self) -> Year {
        self.exhibition.current_year
    }

    async fn dataset(&self, year: Year) -> Result<Dataset, ShowcaseError> {
        self.loader.load(year).await
    }

    pub async fn designers(&self, year: Year) -> Result<Vec<DesignerCard>, ShowcaseError> {
        let dataset = self.dataset(year).await?;
        Ok(dataset.designers.iter()
            .map(|x| DesignerCard::create(x, year, self.assets.as_ref()))
            .collect())
    }

    pub async fn designer_page(&self, year: Year, name: &str) -> Result<Option<DesignerPage>, ShowcaseError> {
        let dataset = self.dataset(year).await?;
        let Some(designer) = resolve_designer(&dataset, name) else {
            debug!("designer {:?} not found in {}", name, year);
            return Ok(None);
        };

        let assets = self.assets.as_ref();
        let card = |x: &Designer| DesignerCard::create(x, year, assets);
        let around = circular_siblings(&dataset.designers, &designer.name);
        let works = resolve_works_for(&dataset, &designer.name).into_iter()
            .map(|x| WorkCard::create(x, year, assets))
            .collect();
        let neighbours = circular_window(&dataset.designers, &designer.name, &DESIGNER_NEIGHBOUR_OFFSETS).into_iter()
            .map(card)
            .collect();

        Ok(Some(DesignerPage {
            year,
            designer: designer.clone(),
            profile_image: assets.designer_profile(year, &designer.name),
            works,
            previous: around.previous.map(card),
            next: around.next.map(card),
            neighbours,
        }))
    }

    /// Works grid of one tab.
    pub async fn works(&self, year: Year, kind: WorkKind) -> Result<Vec<WorkCard>, ShowcaseError> {
        let dataset = self.dataset(year).await?;
        Ok(works_of_kind(&dataset, kind).into_iter()
            .map(|x| WorkCard::create(x, year, self.assets.as_ref()))
            .collect())
    }

    pub async fn post_page(&self, year: Year, id: &str) -> Result<Option<PostPage>, ShowcaseError> {
        let dataset = self.dataset(year).await?;
        let Some(post) = resolve_post_by_id(&dataset, id) else {
            return Ok(None);
        };

        let assets = self.assets.as_ref();
        let around = siblings(&dataset.posts, post.id.as_str());
        Ok(Some(PostPage {
            year,
            post: post.clone(),
            designer: resolve_designer_for_post(&dataset, post).map(|x| DesignerCard::create(x, year, assets)),
            thumbnail: assets.poster_image(year, post, &post.poster_thumb),
            poster_image: assets.poster_image(year, post, &post.poster_file),
            previous: around.previous.map(|x| WorkLink::create(Work::Post(x))),
            next: around.next.map(|x| WorkLink::create(Work::Post(x))),
        }))
    }

    pub async fn video_page(&self, year: Year, id: &str) -> Result<Option<VideoPage>, ShowcaseError> {
        let dataset = self.dataset(year).await?;
        let Some(video) = resolve_video_by_id(&dataset, id) else {
            return Ok(None);
        };

        let assets = self.assets.as_ref();
        let around = siblings(&dataset.videos, video.id.as_str());
        Ok(Some(VideoPage {
            year,
            video: video.clone(),
            designers: resolve_designers_for_video(&dataset, video).into_iter()
                .map(|x| DesignerCard::create(x, year, assets))
                .collect(),
            embed_url: video.video_locator.to_embed_url(),
            thumbnail: assets.video_image(year, video, &video.video_thumb),
            still_cuts: video.still_cuts.iter()
                .map(|x| StillCutView::create(x, video, year, assets))
                .collect(),
            previous: around.previous.map(|x| WorkLink::create(Work::Video(x))),
            next: around.next.map(|x| WorkLink::create(Work::Video(x))),
        }))
    }

    pub async fn team_page(&self, year: Year, id: &str) -> Result<Option<TeamPage>, ShowcaseError> {
        let dataset = self.dataset(year).await?;
        let Some(team) = resolve_team_by_id(&dataset, id) else {
            return Ok(None);
        };

        let assets = self.assets.as_ref();
        let around = siblings(&dataset.teams, team.id.as_str());
        Ok(Some(TeamPage {
            year,
            team: team.clone(),
            title: team.display_title().to_string(),
            members: resolve_team_members(&dataset, team).into_iter()
                .map(|x| DesignerCard::create(x, year, assets))
                .collect(),
            roster: resolve_designers_for_team(&dataset, team).into_iter()
                .map(|x| DesignerCard::create(x, year, assets))
                .collect(),
            main_image: assets.team_image(year, team, &team.main_image),
            embed_url: team.video.to_embed_url(),
            storyboard: team_frames(team, &team.storyboard, &[], year, assets),
            memorise: team_frames(team, &team.memorise, &team.memorise_overlays, year, assets),
            members_image: team.members_image.as_deref().and_then(|x| assets.team_image(year, team, x)),
            production_notes: team_frames(team, &team.production_notes, &[], year, assets),
            previous: around.previous.map(|x| WorkLink::create(Work::Team(x))),
            next: around.next.map(|x| WorkLink::create(Work::Team(x))),
        }))
    }

    pub async fn comments(&self, year: Year) -> Result<CommentSnapshot, ShowcaseError> {
        self.feed.list(year).await
    }

    pub async fn append_comment(&self, year: Year, draft: &CommentDraft) -> Result<Comment, ShowcaseError> {
        self.feed.append(year, draft).await
    }

    pub async fn watch_comments(&self, year: Year) -> Result<CommentWatch, ShowcaseError> {
        self.feed.watch(year).await
    }

    /// Starts an independent page instance sharing this client's loader and comment feed.
    pub fn open_session(&self) -> PageSession<S> {
        PageSession::new(self.loader.clone(), self.feed.clone())
    }
}
