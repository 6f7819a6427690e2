use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    File,
    Image,
}

impl BlobKind {
    fn prefix(self) -> &'static str {
        match self {
            BlobKind::File => "products/files",
            BlobKind::Image => "products/images",
        }
    }
}

/// `products/{files|images}/{uuid}-{name}`; the uuid keeps keys unique even
/// when the same file is uploaded twice.
pub fn new_blob_key(kind: BlobKind, file_name: &str) -> String {
    format!("{}/{}-{}", kind.prefix(), Uuid::new_v4(), sanitize_file_name(file_name))
}

fn sanitize_file_name(name: &str) -> String {
    // browsers may send a full client path
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Extension used for the download filename: the text after the last `.`
/// of the URL's final segment, or `bin`.
pub fn download_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => "bin",
    }
}
