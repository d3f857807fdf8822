use super::render;
use crate::output::Output;
use crate::CommentCommands;
use color_eyre::Result;
use serde_json::json;

pub async fn run_comment(cmd: CommentCommands, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;

    match cmd {
        CommentCommands::Add {
            movie_id,
            text,
            username,
        } => {
            if catalog.find_movie(movie_id).is_none() {
                // Comments are not tied to a collection; warn but still post.
                output.warn(format!("No movie with id {} is loaded", movie_id));
            }
            let username = username.unwrap_or_else(|| catalog.context().display_name().to_string());
            let (comment, outcome) = catalog.add_comment(movie_id, &username, &text).await?;
            output.success(format!("Comment {} added to #{}", comment.id, movie_id));
            if !outcome.remote_applied {
                output.warn("Remote store did not accept the comment; it is kept locally");
            }
            output.data(&json!({ "comment": comment }));
        }
        CommentCommands::List { movie_id } => {
            if !catalog.reload_comments_for(movie_id).await {
                output.warn("Remote store unavailable; showing the local copy");
            }
            let comments = catalog.comments_for(movie_id);
            if output.is_human() {
                if comments.is_empty() {
                    output.info(format!("No comments on #{}", movie_id));
                } else {
                    output.block(render::comments_table(&comments).to_string());
                }
            } else {
                output.data(&json!({ "movieId": movie_id, "comments": comments }));
            }
        }
        CommentCommands::Delete { movie_id, comment_id } => match catalog.delete_comment(movie_id, &comment_id).await {
            Some(outcome) => {
                output.success(format!("Deleted comment {}", comment_id));
                if !outcome.remote_applied {
                    output.warn("Remote store did not accept the deletion; it is applied locally");
                }
            }
            None => output.warn(format!("No comment {} on #{}", comment_id, movie_id)),
        },
    }
    Ok(())
}
