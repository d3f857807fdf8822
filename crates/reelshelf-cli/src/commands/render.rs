use crate::output::Output;
use catalog_core::view::{all_genres, all_tags, all_years};
use catalog_core::View;
use catalog_models::{CollectionKind, CommentRecord, MovieRecord, MAX_USER_RATING};
use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold).fg(Color::Cyan))
        .collect()
}

/// "★★★☆☆" for 3, "-" when unrated.
pub fn stars(rating: Option<u8>) -> String {
    match rating {
        Some(r) => {
            let r = r.min(MAX_USER_RATING) as usize;
            format!("{}{}", "★".repeat(r), "☆".repeat(MAX_USER_RATING as usize - r))
        }
        None => "-".to_string(),
    }
}

pub fn community(movie: &MovieRecord) -> String {
    match (movie.community_rating, movie.rating_count) {
        (Some(avg), Some(count)) if count > 0 => format!("{:.1} ({})", avg, count),
        _ => "-".to_string(),
    }
}

pub fn imdb(movie: &MovieRecord) -> String {
    let rating = movie.effective_imdb_rating();
    if rating > 0.0 {
        format!("{:.1}", rating)
    } else {
        "-".to_string()
    }
}

pub fn timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn movie_table(movies: &[MovieRecord]) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["ID", "Title", "Year", "Genre", "Runtime", "IMDb", "You", "Community", "Tags"]));
    for movie in movies {
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(&movie.title),
            Cell::new(movie.year),
            Cell::new(&movie.genre),
            Cell::new(movie.runtime.as_deref().unwrap_or("-")),
            Cell::new(imdb(movie)),
            Cell::new(stars(movie.user_rating)),
            Cell::new(community(movie)),
            Cell::new(movie.tags.join(", ")),
        ]);
    }
    table
}

pub fn view_summary(view: &View, kind: CollectionKind, output: &Output) -> String {
    if view.total == 0 {
        return output.dim(&format!("No movies in {} match these filters", kind));
    }
    output.dim(&format!(
        "Page {} of {} ({} {} movies)",
        view.page, view.page_count, view.total, kind
    ))
}

/// Filter menus: distinct genres, years and tags of a collection.
pub fn facets(collection: &[MovieRecord], output: &Output) -> String {
    let years: Vec<String> = all_years(collection).iter().map(|y| y.to_string()).collect();
    let mut table = styled_table();
    for (label, values) in [
        ("Genres", all_genres(collection)),
        ("Years", years),
        ("Tags", all_tags(collection)),
    ] {
        let value = if values.is_empty() { output.dim("none") } else { values.join(", ") };
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table.to_string()
}

pub fn movie_detail(movie: &MovieRecord, kind: CollectionKind, output: &Output) -> String {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new(format!("#{}", movie.id)).add_attribute(Attribute::Bold),
        Cell::new(format!("{} ({})", movie.title, movie.year)).add_attribute(Attribute::Bold),
    ]);

    let mut row = |label: &str, value: String| {
        if !value.is_empty() {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
    };
    row("Collection", kind.to_string());
    row("Genre", movie.genre.clone());
    row("Runtime", movie.runtime.clone().unwrap_or_default());
    row("IMDb", imdb(movie));
    row("Your rating", stars(movie.user_rating));
    row("Community", community(movie));
    row("Tags", movie.tags.join(", "));
    row(
        "Added",
        movie
            .date_added_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
    );
    row("IMDb id", movie.imdb_id.clone().unwrap_or_default());
    row("Poster", movie.image.clone());
    row("Description", movie.description.clone());
    row("Plot", movie.plot.clone().unwrap_or_default());

    format!("{}\n{}", output.accent(&movie.title), table)
}

pub fn comments_table(comments: &[&CommentRecord]) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["ID", "When", "User", "Comment"]));
    for comment in comments {
        table.add_row(vec![
            Cell::new(&comment.id),
            Cell::new(timestamp(comment.timestamp)),
            Cell::new(&comment.username),
            Cell::new(&comment.text),
        ]);
    }
    table
}
