use std::sync::Arc;
use gradshow_lib::assets::{AssetLocator, BucketAssetLocator};
use gradshow_lib::client::ShowcaseClient;
use gradshow_lib::comments::FileCommentStore;
use gradshow_lib::config::{Config, DataConfiguration};
use gradshow_lib::loader::{DatasetLoader, DatasetSource, FileDatasetSource, HttpDatasetSource};
use gradshow_lib::{logging, web_ui};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(config.log_level)?;

    let source: Arc<dyn DatasetSource> = match &config.data {
        DataConfiguration::Directory(dir) => {
            info!("serving datasets from {}", dir.display());
            Arc::new(FileDatasetSource::new(dir.clone()))
        }
        DataConfiguration::Remote(url) => {
            info!("serving datasets from {}", url);
            Arc::new(HttpDatasetSource::new(url.clone()))
        }
    };
    let loader = DatasetLoader::new(source, config.exhibition.current_year);
    let assets: Arc<dyn AssetLocator> = Arc::new(BucketAssetLocator::new(&config.assets.base_url));
    let store = FileCommentStore::new(config.comments.dir.clone())?;

    let client = ShowcaseClient::new(loader, assets, store, config.exhibition.clone());
    web_ui::serve(config.server, client).await
}
