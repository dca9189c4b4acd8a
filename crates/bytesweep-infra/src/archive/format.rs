use std::fmt;
use std::str::FromStr;

/// Archive format accepted by `POST /compress`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    /// gzip-compressed tar
    Gzip,
    SevenZip,
    Rar,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported format.")]
pub struct UnsupportedFormat(pub String);

impl ArchiveFormat {
    pub const ALL: [ArchiveFormat; 5] = [
        ArchiveFormat::Zip,
        ArchiveFormat::Tar,
        ArchiveFormat::Gzip,
        ArchiveFormat::SevenZip,
        ArchiveFormat::Rar,
    ];

    /// Format tag as sent by clients
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::Gzip => "gzip",
            ArchiveFormat::SevenZip => "7z",
            ArchiveFormat::Rar => "rar",
        }
    }

    /// File extension of the produced archive
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Gzip => "tar.gz",
            other => other.as_str(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "application/zip",
            ArchiveFormat::Tar => "application/x-tar",
            ArchiveFormat::Gzip => "application/gzip",
            ArchiveFormat::SevenZip => "application/x-7z-compressed",
            ArchiveFormat::Rar => "application/vnd.rar",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zip" => Ok(ArchiveFormat::Zip),
            "tar" => Ok(ArchiveFormat::Tar),
            "gzip" => Ok(ArchiveFormat::Gzip),
            "7z" => Ok(ArchiveFormat::SevenZip),
            "rar" => Ok(ArchiveFormat::Rar),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_format_from_str() {
        assert_eq!("zip".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zip);
        assert_eq!("tar".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Tar);
        assert_eq!("gzip".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Gzip);
        assert_eq!("7z".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::SevenZip);
        assert_eq!("rar".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Rar);

        let err = "exe".parse::<ArchiveFormat>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported format.");
        assert!("".parse::<ArchiveFormat>().is_err());
        assert!("tar.gz".parse::<ArchiveFormat>().is_err());
    }

    #[test]
    fn test_archive_format_tags_are_exact() {
        for tag in ["ZIP", "Tar", "7Z", " rar ", "zip\n", "\tgzip"] {
            assert!(tag.parse::<ArchiveFormat>().is_err(), "{:?} accepted", tag);
        }
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ArchiveFormat::Gzip.extension(), "tar.gz");
        assert_eq!(ArchiveFormat::SevenZip.extension(), "7z");
        for format in ArchiveFormat::ALL {
            assert_eq!(format.as_str().parse::<ArchiveFormat>().unwrap(), format);
        }
    }
}
