use crate::domain::comments::Comment;
use crate::types::pattern::ExtractPattern;
use crate::types::username::Username;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlairAssignment {
    pub author: String,
    pub flair_text: String,
    pub flair_css_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyAction {
    pub comment_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingAuthor,
    ExistingFlair,
    NoMatch,
    AlreadyReplied,
}

impl SkipReason {
    pub fn label(self) -> &'static str {
        match self {
            SkipReason::MissingAuthor => "missing_author",
            SkipReason::ExistingFlair => "existing_flair",
            SkipReason::NoMatch => "no_match",
            SkipReason::AlreadyReplied => "already_replied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    Assign {
        flair: FlairAssignment,
        reply: Option<ReplyAction>,
    },
}

#[derive(Debug, Clone)]
pub struct FlairPolicy {
    bot_username: Username,
    pattern: ExtractPattern,
    reply_text: Option<String>,
}

impl FlairPolicy {
    pub fn new(
        bot_username: Username,
        pattern: ExtractPattern,
        reply_text: Option<String>,
    ) -> Self {
        let reply_text = reply_text.filter(|text| !text.trim().is_empty());
        Self {
            bot_username,
            pattern,
            reply_text,
        }
    }

    pub fn bot_username(&self) -> &Username {
        &self.bot_username
    }

    pub fn reply_text(&self) -> Option<&str> {
        self.reply_text.as_deref()
    }

    pub fn evaluate(&self, comment: &Comment) -> Decision {
        let Some(author) = comment.author.as_deref().filter(|name| !name.is_empty()) else {
            return Decision::Skip(SkipReason::MissingAuthor);
        };
        if comment.has_flair() {
            return Decision::Skip(SkipReason::ExistingFlair);
        }
        let Some(flair_text) = self.pattern.first_match(&comment.body) else {
            return Decision::Skip(SkipReason::NoMatch);
        };
        if self.has_replied_to(comment) {
            return Decision::Skip(SkipReason::AlreadyReplied);
        }

        let flair = FlairAssignment {
            author: author.to_string(),
            flair_text: flair_text.to_string(),
            flair_css_class: comment.author_flair_css_class.clone().unwrap_or_default(),
        };
        let reply = self.reply_text.as_ref().map(|text| ReplyAction {
            comment_id: comment.id.clone(),
            text: text.clone(),
        });
        Decision::Assign { flair, reply }
    }

    fn has_replied_to(&self, comment: &Comment) -> bool {
        comment.replies.iter().any(|reply| {
            reply
                .author
                .as_deref()
                .is_some_and(|name| self.bot_username.matches(name))
        })
    }
}
