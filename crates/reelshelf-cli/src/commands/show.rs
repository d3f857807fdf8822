use super::render;
use crate::output::Output;
use catalog_core::view::similar_movies;
use catalog_core::CatalogError;
use catalog_models::CollectionKind;
use color_eyre::Result;
use serde_json::json;

const SIMILAR_LIMIT: usize = 5;

pub async fn run_show(id: i64, to_watch: bool, output: &Output) -> Result<()> {
    let (_, catalog) = super::open_catalog(output).await?;

    let found = if to_watch {
        catalog
            .find_in(CollectionKind::ToWatch, id)
            .map(|m| (CollectionKind::ToWatch, m))
    } else {
        catalog.find_movie(id)
    };
    let Some((kind, movie)) = found else {
        let scope = to_watch.then_some(CollectionKind::ToWatch);
        return Err(CatalogError::NotFound { kind: scope, id }.into());
    };

    let comments = catalog.comments_for(movie.id);
    let similar = similar_movies(catalog.collection(kind), movie, SIMILAR_LIMIT);

    if output.is_human() {
        output.block(render::movie_detail(movie, kind, output));

        if comments.is_empty() {
            output.block(output.dim("No comments yet"));
        } else {
            output.block(output.accent(&format!("Comments ({})", comments.len())));
            output.block(render::comments_table(&comments).to_string());
        }

        if !similar.is_empty() {
            output.block(output.accent("Similar titles"));
            output.block(render::movie_table(&similar).to_string());
        }
    } else {
        output.data(&json!({
            "collection": kind.to_string(),
            "movie": movie,
            "comments": comments,
            "similar": similar,
        }));
    }
    Ok(())
}
