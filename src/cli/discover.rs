use colored::Colorize;
use futures::StreamExt;

use crate::{
    discovery::{DiscoveryEngine, LANGUAGES, terms},
    info,
    management::SessionManager,
    success, warning,
};

use super::{api_client, song_table, spinner};

pub async fn discover(limit: usize, refresh: bool, themes: bool) {
    let engine = DiscoveryEngine::with_store(api_client(), SessionManager::new()).await;

    if refresh {
        engine.refresh_discovery().await;
        success!("Started a new discovery session.");
    }

    let pb = spinner("Picking songs for you...");
    let mix = engine.get_for_you_mix(limit).await;
    pb.finish_and_clear();

    println!("{}", "For You".bold());
    if mix.songs.is_empty() {
        info!("Nothing to recommend right now.");
    } else {
        println!("{}", song_table(&mix.songs));
    }

    let pb = spinner(format!("Loading {} languages...", LANGUAGES.len()));
    let mut languages = engine.discovery_stream(limit);
    while let Some((key, bucket)) = languages.next().await {
        pb.suspend(|| {
            println!("{}", terms::language(key).map_or(key, |spec| spec.title).bold());
            if bucket.songs.is_empty() {
                info!("No songs found.");
            } else {
                println!("{}", song_table(&bucket.songs));
            }
        });
    }
    drop(languages);
    pb.finish_and_clear();

    if themes {
        let pb = spinner("Loading themes...");
        let mut themed = engine.themed_stream(limit);
        while let Some((_, bucket)) = themed.next().await {
            pb.suspend(|| {
                println!("{}", bucket.title.bold());
                if bucket.songs.is_empty() {
                    info!("No songs found.");
                } else {
                    println!("{}", song_table(&bucket.songs));
                }
            });
        }
        drop(themed);
        pb.finish_and_clear();
    }

    if let Err(e) = engine.save().await {
        warning!("Couldn't save the discovery session: {}", e);
    }

    let seen = engine.session().await.seen_count();
    info!(
        "{} songs surfaced this session. Use --refresh to start over.",
        seen
    );
}
