use super::prompts;
use crate::output::Output;
use crate::AddArgs;
use catalog_core::MutationOutcome;
use catalog_models::{CollectionKind, MovieRecord};
use color_eyre::Result;
use serde_json::json;

/// Reports a write that only reached the mirror.
fn report_remote(outcome: MutationOutcome, output: &Output) {
    if !outcome.remote_applied {
        output.warn("Remote store did not accept the change; it is kept locally");
    }
    if !outcome.mirrored {
        output.warn("Could not update the local mirror");
    }
}

pub async fn run_add(args: AddArgs, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;
    let kind = super::kind(args.to_watch);

    let movie = MovieRecord {
        genre: args.genre,
        description: args.description,
        image: args.image,
        runtime: args.runtime,
        imdb_id: args.imdb_id,
        imdb_rating: args.imdb_rating,
        rating: args.imdb_rating.unwrap_or(0.0),
        tags: catalog_core::normalize_tags(&args.tags),
        ..MovieRecord::new(0, args.title, args.year)
    };

    let (added, outcome) = catalog.add_movie(kind, movie).await;
    output.success(format!("Added #{} {} ({}) to {}", added.id, added.title, added.year, kind));
    report_remote(outcome, output);
    output.data(&json!({ "collection": kind.to_string(), "movie": added }));
    Ok(())
}

pub async fn run_remove(id: i64, to_watch: bool, yes: bool, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;
    let kind = super::kind(to_watch);

    let Some(movie) = catalog.find_in(kind, id) else {
        output.warn(format!("No movie with id {} in {}", id, kind));
        return Ok(());
    };
    let prompt = format!("Remove \"{}\" from {}?", movie.title, kind);
    if !prompts::confirm(&prompt, yes, output)? {
        output.info("Cancelled");
        return Ok(());
    }

    let removed = catalog.delete_movie(kind, id).await?;
    output.success(format!("Removed #{} {}", removed.id, removed.title));
    Ok(())
}

pub async fn run_poster(id: i64, url: &str, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;
    let outcome = catalog.update_poster(id, url).await?;
    output.success(format!("Poster updated for #{}", id));
    report_remote(outcome, output);
    Ok(())
}

pub async fn run_runtime(id: i64, runtime: &str, to_watch: bool, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;
    let kind = super::kind(to_watch);
    let outcome = catalog.update_runtime(kind, id, runtime).await?;
    output.success(format!("Runtime of #{} set to {}", id, runtime.trim()));
    report_remote(outcome, output);
    Ok(())
}

pub async fn run_tag(id: i64, tags: Vec<String>, append: bool, to_watch: bool, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;
    let kind = super::kind(to_watch);

    let tags = match (append, catalog.find_in(kind, id)) {
        (true, Some(movie)) => movie.tags.iter().cloned().chain(tags).collect(),
        _ => tags,
    };

    let (tags, outcome) = catalog.update_tags(kind, id, &tags).await?;
    if tags.is_empty() {
        output.success(format!("Cleared tags on #{}", id));
    } else {
        output.success(format!("Tags on #{}: {}", id, tags.join(", ")));
    }
    report_remote(outcome, output);
    output.data(&json!({ "id": id, "tags": tags }));
    Ok(())
}

pub async fn run_rate(id: i64, rating: i64, to_watch: bool, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;
    let kind = super::kind(to_watch);

    let outcome = catalog.rate_movie(kind, id, rating).await?;
    output.success(format!(
        "{} rated #{} {}. Community: {:.1} from {} rating(s)",
        catalog.context().display_name(),
        id,
        super::render::stars(Some(outcome.rating)),
        outcome.summary.average,
        outcome.summary.count
    ));
    if !outcome.remote_applied {
        output.warn("Rating saved locally only; the community summary is an estimate");
    }
    output.data(&json!({ "id": id, "rating": outcome }));
    Ok(())
}

pub async fn run_watched(id: i64, yes: bool, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;

    let Some(movie) = catalog.find_in(CollectionKind::ToWatch, id) else {
        output.warn(format!("No movie with id {} in {}", id, CollectionKind::ToWatch));
        return Ok(());
    };
    let prompt = format!("Mark \"{}\" as watched and move it to the main list?", movie.title);
    if !prompts::confirm(&prompt, yes, output)? {
        output.info("Cancelled");
        return Ok(());
    }

    let (moved, outcome) = catalog.mark_as_watched(id).await?;
    output.success(format!("Moved {} to the main list as #{}", moved.title, moved.id));
    report_remote(outcome, output);
    output.data(&json!({ "movie": moved }));
    Ok(())
}
