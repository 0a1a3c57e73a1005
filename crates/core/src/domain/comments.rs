use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub parent_id: String,
    pub body: String,
    // None for deleted accounts too.
    pub author: Option<String>,
    pub author_flair_text: Option<String>,
    pub author_flair_css_class: Option<String>,
    pub is_root: bool,
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn fullname(&self) -> String {
        format!("t1_{}", self.id)
    }

    pub fn has_flair(&self) -> bool {
        self.author_flair_text
            .as_deref()
            .is_some_and(|text| !text.is_empty())
    }
}

// An empty `children` list marks a "continue this thread" link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoreComments {
    pub parent_id: String,
    pub children: Vec<String>,
}

impl MoreComments {
    pub fn is_continue_thread(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub comments: Vec<Comment>,
    pub more: Vec<MoreComments>,
}

impl Submission {
    pub fn fullname(&self) -> String {
        format!("t3_{}", self.id)
    }

    // Breadth-first.
    pub fn list(&self) -> Vec<&Comment> {
        let mut output = Vec::new();
        let mut queue: VecDeque<&Comment> = self.comments.iter().collect();
        while let Some(comment) = queue.pop_front() {
            output.push(comment);
            queue.extend(comment.replies.iter());
        }
        output
    }

    pub fn root_comments(&self) -> impl Iterator<Item = &Comment> {
        self.list().into_iter().filter(|comment| comment.is_root)
    }
}

#[cfg(test)]
mod tests {
    use super::{Comment, MoreComments, Submission};

    fn comment(id: &str, is_root: bool, replies: Vec<Comment>) -> Comment {
        Comment {
            id: id.to_string(),
            is_root,
            replies,
            ..Comment::default()
        }
    }

    #[test]
    fn list_is_breadth_first() {
        let submission = Submission {
            id: "abc".to_string(),
            comments: vec![
                comment("a", true, vec![comment("a1", false, vec![comment("a1x", false, vec![])])]),
                comment("b", true, vec![comment("b1", false, vec![])]),
            ],
            ..Submission::default()
        };
        let ids: Vec<&str> = submission.list().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "a1", "b1", "a1x"]);
    }

    #[test]
    fn root_comments_skip_nested() {
        let submission = Submission {
            id: "abc".to_string(),
            comments: vec![
                comment("a", true, vec![comment("a1", false, vec![])]),
                comment("b", true, vec![]),
            ],
            ..Submission::default()
        };
        let ids: Vec<&str> = submission.root_comments().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn has_flair_treats_empty_as_none() {
        let mut c = comment("a", true, vec![]);
        assert!(!c.has_flair());
        c.author_flair_text = Some(String::new());
        assert!(!c.has_flair());
        c.author_flair_text = Some("existing flair".to_string());
        assert!(c.has_flair());
    }

    #[test]
    fn fullnames_use_kind_prefix() {
        let c = comment("xyz", true, vec![]);
        assert_eq!(c.fullname(), "t1_xyz");
        let s = Submission {
            id: "abc".to_string(),
            ..Submission::default()
        };
        assert_eq!(s.fullname(), "t3_abc");
        let more = MoreComments::default();
        assert!(more.is_continue_thread());
    }
}
