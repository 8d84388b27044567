//! Subcommand handlers for the `ikono` binary.

use std::sync::Arc;

use ikono::{
    application::{
        catalog::Catalog,
        content::{ContentService, Fetched},
        error::AppError,
        images::{ImageOptimizer, PRELOAD_QUALITY},
        repos::ContentGateway,
    },
    cache::{ImageCacheConfig, ImageUrlCache},
    config::{
        ArtworksArgs, Carousel, Command, EnquireArgs, ExhibitionArgs, HomeArgs, ImageArgs,
        PreloadArgs, Settings, SrcsetArgs,
    },
    domain::{
        achievements::group_by_category_and_year,
        images::ImageOptions,
        locale::Locale,
    },
    infra::{
        cockpit::CockpitClient,
        enquiry::{EnquiryClient, EnquiryForm},
    },
};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::warn;

pub struct Context {
    catalog: Catalog,
    images: ImageOptimizer,
    locale: Locale,
    sweeper: JoinHandle<()>,
}

impl Context {
    pub fn build(settings: &Settings) -> Result<Self, AppError> {
        let gateway: Arc<dyn ContentGateway> = Arc::new(CockpitClient::new(&settings.cockpit)?);
        let locale = settings.cockpit.default_locale;

        let cache = Arc::new(ImageUrlCache::new(ImageCacheConfig::from(&settings.images)));
        let sweeper = cache.spawn_sweeper();

        Ok(Self {
            catalog: Catalog::new(ContentService::new(gateway.clone(), locale)),
            images: ImageOptimizer::new(gateway, cache),
            locale,
            sweeper,
        })
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}

pub async fn dispatch(ctx: &Context, command: Command) -> Result<(), AppError> {
    let catalog = &ctx.catalog;
    let locale = ctx.locale;

    match command {
        Command::Artists => print_json(&settle(catalog.get_artists(locale).await)),
        Command::Artist(args) => {
            let artist = require(
                catalog.get_artist_by_id(&args.id, locale).await,
                "artist",
                &args.id,
            )?;
            print_json(&artist)
        }
        Command::Artworks(args) => artworks(catalog, locale, args).await,
        Command::Artwork(args) => {
            let artwork = require(
                catalog.get_artwork_by_id(&args.id, locale).await,
                "artwork",
                &args.id,
            )?;
            print_json(&artwork)
        }
        Command::Achievements(args) => {
            let artist = require(
                catalog.get_artist_by_id(&args.id, locale).await,
                "artist",
                &args.id,
            )?;
            print_json(&group_by_category_and_year(&artist))
        }
        Command::Exhibitions => print_json(&settle(catalog.get_exhibitions(locale).await)),
        Command::Exhibition(args) => exhibition(catalog, locale, args).await,
        Command::Home(args) => home(catalog, locale, args).await,
        Command::Pages => print_json(&settle(catalog.get_pages(locale).await)),
        Command::Page(args) => {
            let page = require(
                catalog.get_page_by_id(&args.id, locale).await,
                "page",
                &args.id,
            )?;
            print_json(&page)
        }
        Command::Image(args) => image(&ctx.images, args).await,
        Command::Srcset(args) => srcset(&ctx.images, args).await,
        Command::Preload(args) => preload(&ctx.images, args).await,
        Command::Enquire(args) => enquire(&args).await,
    }
}

async fn artworks(catalog: &Catalog, locale: Locale, args: ArtworksArgs) -> Result<(), AppError> {
    if args.highlighted {
        return print_json(&settle(
            catalog.get_highlighted_artworks(locale, args.limit).await,
        ));
    }
    match args.artist {
        Some(artist_id) => print_json(&settle(
            catalog.get_artworks_by_artist(&artist_id, locale).await,
        )),
        None => print_json(&settle(catalog.get_artworks(locale).await)),
    }
}

async fn exhibition(
    catalog: &Catalog,
    locale: Locale,
    args: ExhibitionArgs,
) -> Result<(), AppError> {
    if args.artworks {
        return print_json(&settle(
            catalog.get_artworks_by_exhibition(&args.id, locale).await,
        ));
    }
    let exhibition = require(
        catalog.get_exhibition_by_id(&args.id, locale).await,
        "exhibition",
        &args.id,
    )?;
    print_json(&exhibition)
}

async fn home(catalog: &Catalog, locale: Locale, args: HomeArgs) -> Result<(), AppError> {
    match args.carousel {
        Some(Carousel::Artists) => {
            print_json(&settle(catalog.get_home_carousel_artists(locale).await))
        }
        Some(Carousel::Artworks) => {
            print_json(&settle(catalog.get_home_carousel_artworks(locale).await))
        }
        None => {
            let home = require(catalog.get_home_page(locale).await, "home page", "homepage")?;
            print_json(&home)
        }
    }
}

async fn image(images: &ImageOptimizer, args: ImageArgs) -> Result<(), AppError> {
    let options = ImageOptions::from(&args.options);
    let url = images.get_optimized_image(&args.id, &options).await;
    println!("{url}");
    Ok(())
}

async fn srcset(images: &ImageOptimizer, args: SrcsetArgs) -> Result<(), AppError> {
    let options = ImageOptions::from(&args.options);
    let srcset = images
        .generate_responsive_srcset(&args.id, &options, &args.breakpoints)
        .await;
    println!("{srcset}");
    Ok(())
}

#[derive(Serialize)]
struct PreloadedImage<'a> {
    id: &'a str,
    url: String,
}

async fn preload(images: &ImageOptimizer, args: PreloadArgs) -> Result<(), AppError> {
    let options = ImageOptions {
        quality: args.quality.unwrap_or(PRELOAD_QUALITY),
        ..ImageOptions::default()
    };
    let urls = images.preload(&args.ids, Some(options)).await;
    let preloaded: Vec<_> = args
        .ids
        .iter()
        .zip(urls)
        .map(|(id, url)| PreloadedImage { id, url })
        .collect();
    print_json(&preloaded)
}

pub async fn enquire(args: &EnquireArgs) -> Result<(), AppError> {
    if args.fields.is_empty() {
        return Err(AppError::validation("at least one --field is required"));
    }
    let client = EnquiryClient::new(&args.site)?;
    let form: EnquiryForm = args.fields.iter().cloned().collect();
    client.submit(&form).await?;
    println!("enquiry sent to {}", client.endpoint());
    Ok(())
}

/// Fail-open value; the reason for a degraded read goes to the log.
fn settle<T>(fetched: Fetched<T>) -> T {
    let (value, reason) = fetched.into_parts();
    if let Some(reason) = reason {
        warn!(
            target = "ikono::commands",
            reason = %reason,
            "showing partial content"
        );
    }
    value
}

fn require<T>(fetched: Fetched<Option<T>>, entity: &'static str, id: &str) -> Result<T, AppError> {
    settle(fetched).ok_or_else(|| AppError::not_found(entity, id))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::unexpected(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}
