use crate::api::Comment;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyBlock {
    pub id: u64,
    pub author: String,
    pub content: String,
    /// Author of the parent comment, for "@x replying to @y".
    pub reply_to: String,
    pub can_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParentBlock {
    pub id: u64,
    pub author: String,
    pub content: String,
    pub can_delete: bool,
    pub replies: Vec<ReplyBlock>,
}

/// Two-level display of a comment list, with per-block action visibility
/// for one viewer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadView {
    pub blocks: Vec<ParentBlock>,
}

impl ThreadView {
    pub fn build(comments: &[Comment], viewer: Option<&str>) -> Self {
        let owns = |author: &str| viewer.map(|v| v == author).unwrap_or(false);

        let blocks = comments
            .iter()
            .map(|c| ParentBlock {
                id: c.id,
                author: c.author.clone(),
                content: c.content.clone(),
                can_delete: owns(&c.author),
                replies: c
                    .replies
                    .iter()
                    .map(|r| ReplyBlock {
                        id: r.id,
                        author: r.author.clone(),
                        content: r.content.clone(),
                        reply_to: c.author.clone(),
                        can_delete: owns(&r.author),
                    })
                    .collect(),
            })
            .collect();

        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn render(&self) -> String {
        if self.blocks.is_empty() {
            return "No comments yet.\n".to_string();
        }

        let mut out = String::new();
        for block in &self.blocks {
            out.push_str(&format!(
                "[{}] @{}{}\n",
                block.id,
                block.author,
                ownership_marker(block.can_delete)
            ));
            out.push_str(&format!("    {}\n", block.content));
            for reply in &block.replies {
                out.push_str(&format!(
                    "    [{}] @{} replying to @{}{}\n",
                    reply.id,
                    reply.author,
                    reply.reply_to,
                    ownership_marker(reply.can_delete)
                ));
                out.push_str(&format!("        {}\n", reply.content));
            }
        }
        out
    }
}

fn ownership_marker(can_delete: bool) -> &'static str {
    if can_delete {
        " (yours)"
    } else {
        ""
    }
}
