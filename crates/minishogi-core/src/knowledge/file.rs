//! 知識ファイルの形式判定と原子的な書き込み

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use super::error::KnowledgeError;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// 読み込んだ内容の形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeFormat {
    /// 空（空白のみを含む）
    Empty,
    Gzip,
    LegacyJson,
    Lines,
}

/// 先頭バイトから形式を判定
pub fn detect_format(data: &[u8]) -> KnowledgeFormat {
    if data.starts_with(&GZIP_MAGIC) {
        return KnowledgeFormat::Gzip;
    }
    match data.iter().find(|b| !b.is_ascii_whitespace()) {
        None => KnowledgeFormat::Empty,
        Some(b'{') => KnowledgeFormat::LegacyJson,
        Some(_) => KnowledgeFormat::Lines,
    }
}

/// デコード前の知識テキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeText {
    Lines(String),
    LegacyJson(String),
}

/// 知識ファイルの場所と保存方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeFile {
    path: PathBuf,
    compress: bool,
}

impl KnowledgeFile {
    pub fn new(path: impl Into<PathBuf>, compress: bool) -> Self {
        KnowledgeFile {
            path: path.into(),
            compress,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイルを読み、形式を判定したテキストを返す
    ///
    /// ファイルが存在しない・空の場合は `None`（エラーではない）。
    pub fn read(&self) -> Result<Option<KnowledgeText>, KnowledgeError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(KnowledgeError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        decode_bytes(data)
    }

    /// 本文を一時ファイルに書き、最終パスへ rename する
    pub fn write(&self, body: &str) -> Result<(), KnowledgeError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| KnowledgeError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let tmp = tmp_path(&self.path);
        let written = open_writer(&tmp, self.compress).and_then(|mut w| {
            w.write_all(body.as_bytes())?;
            w.close()
        });
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp);
            return Err(KnowledgeError::Write { path: tmp, source });
        }
        #[cfg(windows)]
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
        fs::rename(&tmp, &self.path).map_err(|source| KnowledgeError::Rename {
            from: tmp.clone(),
            to: self.path.clone(),
            source,
        })
    }
}

fn decode_bytes(data: Vec<u8>) -> Result<Option<KnowledgeText>, KnowledgeError> {
    match detect_format(&data) {
        KnowledgeFormat::Empty => Ok(None),
        KnowledgeFormat::Gzip => {
            let mut raw = Vec::new();
            MultiGzDecoder::new(data.as_slice()).read_to_end(&mut raw)?;
            // 展開後に再び gzip が現れることはない
            if detect_format(&raw) == KnowledgeFormat::Gzip {
                return Err(KnowledgeError::malformed(0, "nested gzip stream"));
            }
            decode_bytes(raw)
        }
        KnowledgeFormat::LegacyJson => Ok(Some(KnowledgeText::LegacyJson(into_text(data)?))),
        KnowledgeFormat::Lines => Ok(Some(KnowledgeText::Lines(into_text(data)?))),
    }
}

fn into_text(data: Vec<u8>) -> Result<String, KnowledgeError> {
    String::from_utf8(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn tmp_path(path: &Path) -> PathBuf {
    let pid = std::process::id();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("knowledge");
    path.with_extension(format!("{ext}.tmp.{pid}"))
}

/// 圧縮の有無を隠す書き込み先。`close` で gzip の終端まで書き切る
#[must_use = "call .close() to propagate compression/IO errors"]
enum Writer {
    Plain(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Writer::Plain(w) => w.write(buf),
            Writer::Gz(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Writer::Plain(w) => w.flush(),
            Writer::Gz(e) => e.flush(),
        }
    }
}

impl Writer {
    fn close(self) -> io::Result<()> {
        let buffered = match self {
            Writer::Plain(w) => w,
            Writer::Gz(e) => e.finish()?,
        };
        let file = buffered.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}

fn open_writer(path: &Path, compress: bool) -> io::Result<Writer> {
    let file = BufWriter::new(File::create(path)?);
    if compress {
        return Ok(Writer::Gz(GzEncoder::new(file, Compression::default())));
    }
    Ok(Writer::Plain(file))
}
