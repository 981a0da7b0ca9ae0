//! Pending comment queues.
//!
//! A queue is an append-only list plus a read cursor, so a checkpoint can
//! snapshot it as two integers and a rollback restores it exactly.

/// Snapshot of one queue: (read cursor, length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueMark(usize, usize);

#[derive(Debug, Clone, Default)]
pub struct CommentQueue {
    items: Vec<String>,
    front: usize,
}

impl CommentQueue {
    pub fn push(&mut self, comment: impl Into<String>) {
        self.items.push(comment.into());
    }

    pub fn is_empty(&self) -> bool {
        self.front >= self.items.len()
    }

    /// Drain every pending comment, joined with `\r\n`. `#` comments are
    /// rewritten to `//`. Returns `None` when nothing was pending.
    pub fn drain(&mut self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let joined = self.items[self.front..]
            .iter()
            .map(|c| match c.strip_prefix('#') {
                Some(rest) => format!("//{}", rest),
                None => c.clone(),
            })
            .collect::<Vec<_>>()
            .join("\r\n");
        self.front = self.items.len();
        Some(joined)
    }

    /// Drop pending comments without returning them.
    pub fn discard(&mut self) {
        self.front = self.items.len();
    }

    pub fn mark(&self) -> QueueMark {
        QueueMark(self.front, self.items.len())
    }

    pub fn reset(&mut self, mark: QueueMark) {
        self.front = mark.0;
        self.items.truncate(mark.1);
    }
}

/// Head comments belong to the next item; tail comments to the item just read.
#[derive(Debug, Clone, Default)]
pub struct CommentQueues {
    pub head: CommentQueue,
    pub tail: CommentQueue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentMark {
    head: QueueMark,
    tail: QueueMark,
}

impl CommentQueues {
    pub fn mark(&self) -> CommentMark {
        CommentMark {
            head: self.head.mark(),
            tail: self.tail.mark(),
        }
    }

    pub fn reset(&mut self, mark: CommentMark) {
        self.head.reset(mark.head);
        self.tail.reset(mark.tail);
    }
}
