use tracing::{debug, error, info};

use crate::jobs::JobError;
use flairbot_core::domain::comments::Comment;
use flairbot_core::domain::flair::{Decision, FlairPolicy, SkipReason};
use flairbot_infra::reddit::ForumClient;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlairRunStats {
    pub comments_seen: usize,
    pub roots_evaluated: usize,
    pub flair_set: usize,
    pub replies_posted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    Flaired { replied: bool },
}

pub async fn run<C>(
    client: &C,
    policy: &FlairPolicy,
    community: &str,
    submission_id: &str,
) -> Result<FlairRunStats, JobError>
where
    C: ForumClient + ?Sized,
{
    let mut submission = client.fetch_submission(submission_id).await?;
    client.expand_all_comments(&mut submission).await?;
    info!(
        submission_id = %submission.id,
        title = %submission.title,
        "submission comments loaded"
    );

    let mut stats = FlairRunStats {
        comments_seen: submission.list().len(),
        ..FlairRunStats::default()
    };
    for comment in submission.root_comments() {
        stats.roots_evaluated += 1;
        match process(client, policy, community, comment).await? {
            Outcome::Skipped(_) => stats.skipped += 1,
            Outcome::Flaired { replied } => {
                stats.flair_set += 1;
                if replied {
                    stats.replies_posted += 1;
                }
            }
        }
    }
    Ok(stats)
}

pub async fn process<C>(
    client: &C,
    policy: &FlairPolicy,
    community: &str,
    comment: &Comment,
) -> Result<Outcome, JobError>
where
    C: ForumClient + ?Sized,
{
    debug!(comment_id = %comment.id, "processing comment");
    let (flair, reply) = match policy.evaluate(comment) {
        Decision::Skip(reason) => {
            debug!(comment_id = %comment.id, reason = reason.label(), "comment skipped");
            return Ok(Outcome::Skipped(reason));
        }
        Decision::Assign { flair, reply } => (flair, reply),
    };

    if let Err(err) = client
        .set_flair(community, &flair.author, &flair.flair_text, &flair.flair_css_class)
        .await
    {
        error!(comment_id = %comment.id, author = %flair.author, error = %err, "set flair failed");
        return Err(err.into());
    }
    info!(author = %flair.author, flair = %flair.flair_text, "flair set");

    let Some(reply) = reply else {
        return Ok(Outcome::Flaired { replied: false });
    };
    if let Err(err) = client.post_reply(comment, &reply.text).await {
        error!(comment_id = %reply.comment_id, error = %err, "reply failed");
        return Err(err.into());
    }
    info!(comment_id = %reply.comment_id, "reply posted");
    Ok(Outcome::Flaired { replied: true })
}
