use std::path::Path;

use crate::error::MediaResult;

/// Moves a file, falling back to copy+delete when `rename` fails with
/// `EXDEV` (crossing a filesystem boundary, e.g. a tmpfs `temp_dir`
/// mounted separately from the output volume).
pub async fn move_file(from: &Path, to: &Path) -> MediaResult<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => copy_and_delete(from, to).await,
        Err(e) => Err(e.into()),
    }
}

fn is_cross_device_error(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(libc_exdev())
}

#[cfg(unix)]
fn libc_exdev() -> i32 {
    18 // EXDEV on Linux/most unixes
}

#[cfg(not(unix))]
fn libc_exdev() -> i32 {
    -1
}

async fn copy_and_delete(from: &Path, to: &Path) -> MediaResult<()> {
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await?;
    Ok(())
}

/// Returns free disk space in megabytes for the filesystem containing
/// `path`, used by the Download Manager's preflight check.
pub fn free_space_mb(path: &Path) -> MediaResult<u64> {
    use sysinfo::Disks;

    let disks = Disks::new_with_refreshed_list();
    let mut best_match: Option<(&std::path::Path, u64)> = None;

    for disk in disks.list() {
        let mount_point = disk.mount_point();
        if path.starts_with(mount_point) {
            let is_better = best_match
                .map(|(current, _)| mount_point.as_os_str().len() > current.as_os_str().len())
                .unwrap_or(true);
            if is_better {
                best_match = Some((mount_point, disk.available_space()));
            }
        }
    }

    Ok(best_match.map(|(_, bytes)| bytes / (1024 * 1024)).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn move_file_within_same_dir_succeeds() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");
        tokio::fs::write(&from, b"hello").await.unwrap();

        move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(tokio::fs::read(&to).await.unwrap(), b"hello");
    }

    #[test]
    fn free_space_reports_a_positive_value_for_tmp() {
        let dir = TempDir::new().unwrap();
        let mb = free_space_mb(dir.path()).unwrap();
        assert!(mb > 0);
    }
}
