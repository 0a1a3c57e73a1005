use serde::Deserialize;
use serde_json::Value;

use flairbot_core::domain::comments::{Comment, MoreComments, Submission};

use super::RedditError;

const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct LinkData {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    id: String,
    parent_id: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    author_flair_text: Option<String>,
    #[serde(default)]
    author_flair_css_class: Option<String>,
    // Either an empty string or a nested listing.
    #[serde(default)]
    replies: Value,
}

#[derive(Debug, Deserialize)]
struct MoreData {
    parent_id: String,
    #[serde(default)]
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    json: ApiBody,
}

#[derive(Debug, Deserialize)]
struct ApiBody {
    #[serde(default)]
    errors: Vec<Value>,
    #[serde(default)]
    data: Option<MoreChildrenData>,
}

#[derive(Debug, Deserialize)]
struct MoreChildrenData {
    #[serde(default)]
    things: Vec<Thing>,
}

pub(crate) fn parse_submission(payload: Value) -> Result<Submission, RedditError> {
    let listings: Vec<Listing> = serde_json::from_value(payload)
        .map_err(|err| RedditError::InvalidResponse(format!("submission listing: {err}")))?;
    let mut listings = listings.into_iter();
    let link_listing = listings
        .next()
        .ok_or(RedditError::MissingData("link listing"))?;
    let comment_listing = listings
        .next()
        .ok_or(RedditError::MissingData("comment listing"))?;

    let link = link_listing
        .data
        .children
        .into_iter()
        .find(|thing| thing.kind == "t3")
        .ok_or(RedditError::MissingData("link"))?;
    let link: LinkData = decode(link.data, "link")?;

    let mut more = Vec::new();
    let comments = map_children(comment_listing.data.children, &mut more)?;
    Ok(Submission {
        id: link.id,
        title: link.title,
        comments,
        more,
    })
}

pub(crate) fn parse_more_children(
    payload: Value,
) -> Result<(Vec<Comment>, Vec<MoreComments>), RedditError> {
    let envelope: ApiEnvelope = serde_json::from_value(payload)
        .map_err(|err| RedditError::InvalidResponse(format!("morechildren: {err}")))?;
    if !envelope.json.errors.is_empty() {
        return Err(RedditError::Api(join_errors(&envelope.json.errors)));
    }
    let things = envelope.json.data.map(|data| data.things).unwrap_or_default();
    let mut more = Vec::new();
    let comments = map_children(things, &mut more)?;
    Ok((comments, more))
}

pub(crate) fn check_api_errors(payload: &Value) -> Result<(), RedditError> {
    let errors = payload
        .get("json")
        .and_then(|json| json.get("errors"))
        .and_then(Value::as_array);
    match errors {
        Some(errors) if !errors.is_empty() => Err(RedditError::Api(join_errors(errors))),
        _ => Ok(()),
    }
}

fn map_children(
    children: Vec<Thing>,
    more: &mut Vec<MoreComments>,
) -> Result<Vec<Comment>, RedditError> {
    let mut comments = Vec::with_capacity(children.len());
    for thing in children {
        match thing.kind.as_str() {
            "t1" => comments.push(map_comment(decode(thing.data, "comment")?, more)?),
            "more" => more.push(map_more(decode(thing.data, "more")?)),
            _ => {}
        }
    }
    Ok(comments)
}

fn map_comment(data: CommentData, more: &mut Vec<MoreComments>) -> Result<Comment, RedditError> {
    let replies = if data.replies.is_object() {
        let listing: Listing = decode(data.replies, "replies")?;
        map_children(listing.data.children, more)?
    } else {
        Vec::new()
    };
    let author = data
        .author
        .filter(|name| !name.is_empty() && name != DELETED_AUTHOR);
    Ok(Comment {
        is_root: data.parent_id.starts_with("t3_"),
        id: data.id,
        parent_id: data.parent_id,
        body: data.body,
        author,
        author_flair_text: data.author_flair_text,
        author_flair_css_class: data.author_flair_css_class,
        replies,
    })
}

fn map_more(data: MoreData) -> MoreComments {
    MoreComments {
        parent_id: data.parent_id,
        children: data.children,
    }
}

fn decode<T>(value: Value, what: &'static str) -> Result<T, RedditError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(value)
        .map_err(|err| RedditError::InvalidResponse(format!("{what}: {err}")))
}

fn join_errors(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|err| match err {
            Value::Array(parts) => parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(": "),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
