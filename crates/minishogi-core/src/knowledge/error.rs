//! 知識ファイルのエラー型

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 知識の読み込み・保存エラー
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    /// レコード形式・数値・タグの不正
    #[error("malformed knowledge at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("invalid legacy JSON knowledge: {0}")]
    LegacyJson(#[from] serde_json::Error),
}

impl KnowledgeError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        KnowledgeError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}
