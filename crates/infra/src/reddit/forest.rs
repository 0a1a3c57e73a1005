use flairbot_core::domain::comments::Comment;

// Parents must already be in the tree or earlier in `incoming`.
pub(crate) fn graft(roots: &mut Vec<Comment>, link_fullname: &str, incoming: Vec<Comment>) {
    for comment in incoming {
        if contains(roots, &comment.id) {
            continue;
        }
        if comment.parent_id == link_fullname {
            roots.push(comment);
            continue;
        }
        let Some(parent_id) = comment.parent_id.strip_prefix("t1_") else {
            continue;
        };
        if let Some(parent) = find_mut(roots, parent_id) {
            parent.replies.push(comment);
        }
    }
}

fn contains(comments: &[Comment], id: &str) -> bool {
    comments
        .iter()
        .any(|comment| comment.id == id || contains(&comment.replies, id))
}

fn find_mut<'a>(comments: &'a mut [Comment], id: &str) -> Option<&'a mut Comment> {
    for comment in comments.iter_mut() {
        if comment.id == id {
            return Some(comment);
        }
        if let Some(found) = find_mut(&mut comment.replies, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use flairbot_core::domain::comments::Comment;

    use super::graft;

    fn comment(id: &str, parent: &str) -> Comment {
        Comment {
            id: id.to_string(),
            parent_id: parent.to_string(),
            is_root: parent.starts_with("t3_"),
            ..Comment::default()
        }
    }

    #[test]
    fn graft_appends_roots_and_nests_replies() {
        let mut roots = vec![comment("a", "t3_abc")];
        let incoming = vec![
            comment("b", "t3_abc"),
            comment("b1", "t1_b"),
            comment("a1", "t1_a"),
            comment("b1x", "t1_b1"),
        ];
        graft(&mut roots, "t3_abc", incoming);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].replies[0].id, "a1");
        assert_eq!(roots[1].replies[0].id, "b1");
        assert_eq!(roots[1].replies[0].replies[0].id, "b1x");
    }

    #[test]
    fn graft_drops_orphans_and_duplicates() {
        let mut roots = vec![comment("a", "t3_abc")];
        let incoming = vec![comment("a", "t3_abc"), comment("z1", "t1_z")];
        graft(&mut roots, "t3_abc", incoming);
        assert_eq!(roots.len(), 1);
        assert!(roots[0].replies.is_empty());
    }
}
