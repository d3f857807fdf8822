use super::render;
use crate::output::Output;
use crate::{DensityArg, ListArgs};
use catalog_config::{Density, ViewConfig};
use catalog_core::view::{all_genres, all_tags, all_years, recent_movies};
use catalog_core::{AppContext, ViewParams, ViewState};
use catalog_models::CollectionKind;
use color_eyre::Result;
use serde_json::json;

fn page_size(args: &ListArgs, view: &ViewConfig) -> usize {
    if let Some(size) = args.page_size {
        return size;
    }
    match args.density {
        Some(DensityArg::Compact) => view.page_size(Density::Compact),
        Some(DensityArg::Wide) => view.page_size(Density::Wide),
        None => view.default_page_size(),
    }
}

/// Applies the flags to a fresh `ViewState` the way interactive filter
/// changes would, with the requested page set last.
pub fn build_params(args: &ListArgs, view: &ViewConfig, context: &AppContext) -> ViewParams {
    let mut state = ViewState::default();
    state.set_page_size(page_size(args, view));
    state.set_sort(args.sort.unwrap_or(context.sort_preference));
    for genre in &args.genres {
        state.toggle_genre(genre, true);
    }
    for year in &args.years {
        state.toggle_year(*year, true);
    }
    for tag in &args.tags {
        state.toggle_tag(tag, true);
    }
    if let Some(search) = &args.search {
        state.set_search(search.as_str());
    }
    state.set_rating_range(args.min_rating, args.max_rating);
    state.set_runtime_filter(args.runtime);
    state.set_page(args.page);
    state.into_params()
}

pub async fn run_list(args: ListArgs, output: &Output) -> Result<()> {
    let (config, catalog) = super::open_catalog(output).await?;
    let kind = super::kind(args.to_watch);
    let params = build_params(&args, &config.view, catalog.context());

    let view = catalog.view(kind, &params);
    let collection = catalog.collection(kind);
    let facets = args.facets.then(|| {
        json!({
            "genres": all_genres(collection),
            "years": all_years(collection),
            "tags": all_tags(collection),
        })
    });
    tracing::debug!(collection = %kind, page = view.page, total = view.total, sort = %params.sort_by, "View computed");

    if output.is_human() {
        if !view.movies.is_empty() {
            output.block(render::movie_table(&view.movies).to_string());
        }
        output.block(render::view_summary(&view, kind, output));
        if view.page > view.page_count && view.total > 0 {
            output.warn(format!("Page {} is past the last page ({})", view.page, view.page_count));
        }
        if args.facets {
            output.block(render::facets(collection, output));
        }
    } else {
        let mut data = json!({
            "collection": kind.to_string(),
            "sort": params.sort_by.as_str(),
            "view": view,
        });
        if let Some(facets) = facets {
            data["facets"] = facets;
        }
        output.data(&data);
    }
    Ok(())
}

pub async fn run_recent(limit: usize, output: &Output) -> Result<()> {
    let (_, catalog) = super::open_catalog(output).await?;
    let recent = recent_movies(catalog.collection(CollectionKind::Main), limit);

    if output.is_human() {
        if recent.is_empty() {
            output.info("No movies yet");
        } else {
            output.block(output.accent("Recently added"));
            output.block(render::movie_table(&recent).to_string());
        }
    } else {
        output.data(&json!({ "movies": recent }));
    }
    Ok(())
}
