//! Streaming skimmer engine.
//!
//! Opens a file once to build a handle→offset index, then reopens it for
//! each operation, closing the stream on every exit path — which in idiomatic
//! Rust falls out of RAII (`File` dropped at scope exit) rather than a
//! manual `close()` call. Mutations go through a single temp-file "rewrite"
//! pass shared by `append`, `delete`, and `create_path`, which is also where
//! directory child lists are kept transactionally up to date in place of a
//! legacy post-hoc repair pass (see `DESIGN.md`).

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::archive::{ARCHIVE_HEADER_SIZE, FOOTER_SENTINEL, MAGIC, ROOT_HANDLE};
use crate::commit;
use crate::entry::{
    Entry, EntryPayload, HEADER_SIZE, KIND_COMPRESSED_FILE, KIND_DIRECTORY, KIND_FILE, KIND_SYMLINK,
};
use crate::error::Error;
use crate::primitives::{decode_i32, decode_u16, decode_u32, decode_u48};

pub struct Skimmer {
    path: PathBuf,
    entry_to_offset: BTreeMap<i32, u64>,
    footer_position: u64,
    rng: StdRng,
}

/// Reads the kind byte and total payload length of the entry whose header
/// begins at `offset`, without materializing the payload bytes.
fn entry_payload_len(file: &mut File, offset: u64) -> Result<(u8, u64), Error> {
    file.seek(SeekFrom::Start(offset + 8)).map_err(Error::from)?;
    let mut kind_buf = [0u8; 1];
    file.read_exact(&mut kind_buf).map_err(|_| Error::MalformedInput)?;
    // name(256) + created_at(6) + modified_at(6) + entry crc(4)
    file.seek(SeekFrom::Current(272)).map_err(Error::from)?;

    let kind = kind_buf[0];
    let payload_len: u64 = match kind {
        KIND_FILE => {
            let mut len_buf = [0u8; 6];
            file.read_exact(&mut len_buf).map_err(|_| Error::MalformedInput)?;
            decode_u48(&len_buf)? + 6
        }
        KIND_COMPRESSED_FILE => {
            let mut len_buf = [0u8; 6];
            file.read_exact(&mut len_buf).map_err(|_| Error::MalformedInput)?;
            decode_u48(&len_buf)? + 12
        }
        KIND_DIRECTORY => {
            let mut count_buf = [0u8; 2];
            file.read_exact(&mut count_buf).map_err(|_| Error::MalformedInput)?;
            (decode_u16(&count_buf)? as u64) * 4 + 2
        }
        KIND_SYMLINK => 4,
        other => return Err(Error::UnknownEntryKind(other)),
    };
    Ok((kind, payload_len))
}

/// Reads the full serialized bytes (header + payload) of the entry at `offset`.
fn read_entry_bytes_at(file: &mut File, offset: u64) -> Result<Vec<u8>, Error> {
    let (_, payload_len) = entry_payload_len(file, offset)?;
    let total = HEADER_SIZE + payload_len;
    file.seek(SeekFrom::Start(offset)).map_err(Error::from)?;
    let mut buf = vec![0u8; total as usize];
    file.read_exact(&mut buf).map_err(|_| Error::MalformedInput)?;
    Ok(buf)
}

fn split_path(path: &str) -> Vec<Vec<u8>> {
    path.split(|c| c == '/' || c == '\\')
        .filter(|s| !s.is_empty())
        .map(|s| s.as_bytes().to_vec())
        .collect()
}

impl Skimmer {
    /// Opens `path` and builds the handle→offset index.
    pub fn open(path: impl AsRef<Path>) -> Result<Skimmer, Error> {
        Self::open_with_rng(path, StdRng::from_entropy())
    }

    /// Like `open`, but with a caller-supplied RNG seed for deterministic
    /// handle allocation, useful in tests that assert on allocated handles.
    pub fn open_seeded(path: impl AsRef<Path>, seed: u64) -> Result<Skimmer, Error> {
        Self::open_with_rng(path, StdRng::seed_from_u64(seed))
    }

    fn open_with_rng(path: impl AsRef<Path>, rng: StdRng) -> Result<Skimmer, Error> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;

        let mut header = [0u8; ARCHIVE_HEADER_SIZE as usize];
        file.read_exact(&mut header).map_err(|_| Error::MalformedInput)?;
        if &header[0..4] != MAGIC {
            return Err(Error::BadMagic);
        }

        let mut entry_to_offset = BTreeMap::new();
        let footer_position;
        loop {
            let offset_before = file.stream_position()?;
            let mut handle_buf = [0u8; 4];
            file.read_exact(&mut handle_buf).map_err(|_| Error::MalformedInput)?;
            let peek = decode_u32(&handle_buf)?;
            if peek == FOOTER_SENTINEL {
                footer_position = offset_before;
                break;
            }
            let handle = decode_i32(&handle_buf)?;
            entry_to_offset.insert(handle, offset_before);

            let (_, payload_len) = entry_payload_len(&mut file, offset_before)?;
            file.seek(SeekFrom::Start(offset_before + HEADER_SIZE + payload_len))?;
        }

        Ok(Skimmer {
            path,
            entry_to_offset,
            footer_position,
            rng,
        })
    }

    /// The current handle→offset index, primarily for testing that a fresh
    /// re-open reproduces the live state.
    pub fn index(&self) -> &BTreeMap<i32, u64> {
        &self.entry_to_offset
    }

    pub fn footer_position(&self) -> u64 {
        self.footer_position
    }

    /// Looks up `handle`'s offset, seeks, and materializes a full `Entry`.
    /// Returns `Ok(None)` if the handle is not indexed.
    pub fn fetch(&self, handle: i32) -> Result<Option<Entry>, Error> {
        let Some(&offset) = self.entry_to_offset.get(&handle) else {
            return Ok(None);
        };
        let mut file = File::open(&self.path)?;
        let bytes = read_entry_bytes_at(&mut file, offset)?;
        let (entry, _) = Entry::parse(&bytes)?;
        Ok(Some(entry))
    }

    /// Total serialized size (header + payload) of `handle`'s entry, without
    /// materializing its payload bytes.
    pub fn entry_block_size(&self, handle: i32) -> Result<Option<u64>, Error> {
        let Some(&offset) = self.entry_to_offset.get(&handle) else {
            return Ok(None);
        };
        let mut file = File::open(&self.path)?;
        let (_, payload_len) = entry_payload_len(&mut file, offset)?;
        Ok(Some(HEADER_SIZE + payload_len))
    }

    fn generate_unique_handle_avoiding(&mut self, reserved: &HashSet<i32>) -> i32 {
        let sentinel = FOOTER_SENTINEL as i32;
        loop {
            let candidate: i32 = self.rng.gen();
            if candidate != sentinel && !reserved.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn generate_unique_handle(&mut self) -> i32 {
        let reserved: HashSet<i32> = self.entry_to_offset.keys().copied().collect();
        self.generate_unique_handle_avoiding(&reserved)
    }

    /// The single temp-file rewrite shared by `append`, `delete`, and
    /// `create_path`: walks every currently-indexed entry in its existing
    /// physical order (root first, then ascending-handle iteration order of
    /// the offset map), skipping anything in `deleted` and substituting the
    /// freshly serialized bytes of anything in `overrides` **in place of**
    /// its old bytes at that same position — so a directory whose child
    /// list is patched as a side effect of the mutation does not move in
    /// the stream. Genuinely new entries are appended after every survivor,
    /// then the buffered footer trailer is copied, the whole is committed
    /// via the temp-file rename protocol, and the in-memory index is
    /// refreshed.
    fn commit_rewrite(
        &mut self,
        deleted: &HashSet<i32>,
        overrides: &BTreeMap<i32, Entry>,
        new_entries: Vec<Entry>,
    ) -> Result<(), Error> {
        let mut file = File::open(&self.path)?;

        let mut header = vec![0u8; ARCHIVE_HEADER_SIZE as usize];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut header).map_err(|_| Error::MalformedInput)?;

        let file_len = file.seek(SeekFrom::End(0))?;
        if file_len < self.footer_position {
            return Err(Error::MalformedInput);
        }
        let mut trailer = vec![0u8; (file_len - self.footer_position) as usize];
        file.seek(SeekFrom::Start(self.footer_position))?;
        file.read_exact(&mut trailer).map_err(|_| Error::MalformedInput)?;

        let mut out = Vec::with_capacity(file_len as usize);
        out.extend_from_slice(&header);

        let mut new_offsets: Vec<(i32, u64)> = Vec::new();

        // root first, then every other survivor in its existing physical
        // order; an entry in `overrides` is substituted in place rather
        // than moved, so patching a directory's child list never reorders
        // the stream.
        let mut ordered_survivors: Vec<(i32, u64)> = Vec::with_capacity(self.entry_to_offset.len());
        if let Some(&offset) = self.entry_to_offset.get(&ROOT_HANDLE) {
            if !deleted.contains(&ROOT_HANDLE) {
                ordered_survivors.push((ROOT_HANDLE, offset));
            }
        }
        for (&handle, &offset) in self.entry_to_offset.iter() {
            if handle == ROOT_HANDLE || deleted.contains(&handle) {
                continue;
            }
            ordered_survivors.push((handle, offset));
        }

        for (handle, offset) in ordered_survivors {
            let bytes = match overrides.get(&handle) {
                Some(entry) => entry.serialize()?,
                None => read_entry_bytes_at(&mut file, offset)?,
            };
            new_offsets.push((handle, out.len() as u64));
            out.extend_from_slice(&bytes);
        }

        for entry in &new_entries {
            let bytes = entry.serialize()?;
            new_offsets.push((entry.handle, out.len() as u64));
            out.extend_from_slice(&bytes);
        }

        let new_footer_position = out.len() as u64;
        out.extend_from_slice(&trailer);
        drop(file);

        let tmp = commit::tmp_path(&self.path);
        fs::write(&tmp, &out)?;
        commit::commit(&self.path, &tmp, &tmp)?;

        self.entry_to_offset = new_offsets.into_iter().collect();
        self.footer_position = new_footer_position;
        Ok(())
    }

    /// Appends `entries`. Any existing parent directory gains the new
    /// entries' handles in its child list as part of the same commit,
    /// so the child list never drifts out of sync with a later repair pass.
    pub fn append(&mut self, entries: &[Entry]) -> Result<bool, Error> {
        if entries.is_empty() {
            return Ok(true);
        }

        let new_handles: HashSet<i32> = entries.iter().map(|e| e.handle).collect();
        let mut patched_parents: BTreeMap<i32, Entry> = BTreeMap::new();

        for entry in entries {
            let parent = entry.parent_handle;
            if new_handles.contains(&parent) || !self.entry_to_offset.contains_key(&parent) {
                continue;
            }
            if !patched_parents.contains_key(&parent) {
                let fetched = self.fetch(parent)?.ok_or(Error::NoSuchHandle(parent))?;
                patched_parents.insert(parent, fetched);
            }
            let parent_entry = patched_parents.get_mut(&parent).expect("just inserted");
            if let EntryPayload::Directory(children) = &mut parent_entry.payload {
                if !children.contains(&entry.handle) {
                    children.push(entry.handle);
                }
            }
        }

        self.commit_rewrite(&HashSet::new(), &patched_parents, entries.to_vec())?;
        Ok(true)
    }

    /// Deletes `handles`. Each deleted entry's parent directory loses that
    /// handle from its child list in the same commit.
    pub fn delete(&mut self, handles: &[i32]) -> Result<bool, Error> {
        if handles.is_empty() {
            return Ok(true);
        }

        let to_delete: HashSet<i32> = handles.iter().copied().collect();
        let mut patched_parents: BTreeMap<i32, Entry> = BTreeMap::new();

        for &handle in handles {
            let Some(entry) = self.fetch(handle)? else {
                continue;
            };
            let parent = entry.parent_handle;
            if to_delete.contains(&parent) || !self.entry_to_offset.contains_key(&parent) {
                continue;
            }
            if !patched_parents.contains_key(&parent) {
                let fetched = self.fetch(parent)?.ok_or(Error::NoSuchHandle(parent))?;
                patched_parents.insert(parent, fetched);
            }
            let parent_entry = patched_parents.get_mut(&parent).expect("just inserted");
            if let EntryPayload::Directory(children) = &mut parent_entry.payload {
                children.retain(|c| *c != handle);
            }
        }

        self.commit_rewrite(&to_delete, &patched_parents, Vec::new())?;
        Ok(true)
    }

    fn find_child_by_name(&self, dir_handle: i32, name: &[u8]) -> Result<Option<i32>, Error> {
        let Some(dir_entry) = self.fetch(dir_handle)? else {
            return Ok(None);
        };
        let children = match &dir_entry.payload {
            EntryPayload::Directory(children) => children.clone(),
            _ => {
                return Err(Error::NotADirectory(PathBuf::from(
                    String::from_utf8_lossy(name).into_owned(),
                )))
            }
        };
        for child in children {
            if let Some(child_entry) = self.fetch(child)? {
                if child_entry.name == name {
                    return Ok(Some(child));
                }
            }
        }
        Ok(None)
    }

    /// Walks `segments` from the root. Returns the deepest existing handle
    /// reached and how many leading segments matched; if that equals
    /// `segments.len()` the full path already exists.
    fn resolve_path(&self, segments: &[Vec<u8>]) -> Result<(i32, usize), Error> {
        let mut cur = ROOT_HANDLE;
        for (i, segment) in segments.iter().enumerate() {
            match self.find_child_by_name(cur, segment)? {
                Some(child) => cur = child,
                None => return Ok((cur, i)),
            }
        }
        Ok((cur, segments.len()))
    }

    /// Creates (or, with `overwrite`, replaces) a file at `path`, building
    /// any missing directory chain along the way. Returns the
    /// handle of the created/updated file.
    pub fn create_path(&mut self, path: &str, bytes: Vec<u8>, overwrite: bool) -> Result<i32, Error> {
        let segments = split_path(path);
        if segments.is_empty() {
            return Err(Error::AlreadyExists(path.to_string()));
        }

        let (append_point, matched) = self.resolve_path(&segments)?;

        if matched == segments.len() {
            let target = append_point;
            if !overwrite {
                return Err(Error::AlreadyExists(path.to_string()));
            }

            let old_entry = self.fetch(target)?.ok_or(Error::NoSuchHandle(target))?;
            let parent = old_entry.parent_handle;
            let new_handle = self.generate_unique_handle();
            let new_entry = Entry::new_file(new_handle, parent, old_entry.name.clone(), bytes);

            let mut deleted = HashSet::new();
            deleted.insert(target);
            let mut overrides = BTreeMap::new();

            if parent != target && self.entry_to_offset.contains_key(&parent) {
                let mut parent_entry = self.fetch(parent)?.ok_or(Error::NoSuchHandle(parent))?;
                if let EntryPayload::Directory(children) = &mut parent_entry.payload {
                    children.retain(|c| *c != target);
                    children.push(new_handle);
                }
                overrides.insert(parent, parent_entry);
            }

            self.commit_rewrite(&deleted, &overrides, vec![new_entry])?;
            return Ok(new_handle);
        }

        let missing = &segments[matched..];
        let mut reserved: HashSet<i32> = self.entry_to_offset.keys().copied().collect();
        let mut chain_handles = Vec::with_capacity(missing.len());
        for _ in 0..missing.len() {
            let candidate = self.generate_unique_handle_avoiding(&reserved);
            reserved.insert(candidate);
            chain_handles.push(candidate);
        }

        let mut new_entries = Vec::with_capacity(missing.len());
        for (i, segment) in missing.iter().enumerate() {
            let handle = chain_handles[i];
            let parent = if i == 0 { append_point } else { chain_handles[i - 1] };
            if i + 1 == missing.len() {
                new_entries.push(Entry::new_file(handle, parent, segment.clone(), bytes.clone()));
            } else {
                let mut dir = Entry::new_directory(handle, parent, segment.clone());
                dir.payload = EntryPayload::Directory(vec![chain_handles[i + 1]]);
                new_entries.push(dir);
            }
        }

        let mut overrides = BTreeMap::new();
        if self.entry_to_offset.contains_key(&append_point) {
            let mut append_point_entry = self
                .fetch(append_point)?
                .ok_or(Error::NoSuchHandle(append_point))?;
            match &mut append_point_entry.payload {
                EntryPayload::Directory(children) => children.push(chain_handles[0]),
                _ => return Err(Error::NotADirectory(PathBuf::from(path))),
            }
            overrides.insert(append_point, append_point_entry);
        }

        self.commit_rewrite(&HashSet::new(), &overrides, new_entries)?;
        Ok(*chain_handles.last().expect("missing has at least one segment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Archive;
    use crate::entry::EntryPayload;
    use tempfile::tempdir;

    fn scenario_two() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archive.tevd");

        let mut archive = Archive::new(1024, "hello");
        archive.insert(Entry::new_file(42, ROOT_HANDLE, "readme", b"hi".to_vec()));
        if let EntryPayload::Directory(children) = &mut archive.get_mut(ROOT_HANDLE).unwrap().payload {
            children.push(42);
        }
        fs::write(&path, archive.save().unwrap()).unwrap();

        (dir, path)
    }

    #[test]
    fn open_indexes_root_at_header_size() {
        let (_dir, path) = scenario_two();
        let skimmer = Skimmer::open(&path).unwrap();
        assert_eq!(skimmer.index()[&ROOT_HANDLE], ARCHIVE_HEADER_SIZE);
    }

    #[test]
    fn fetch_unpads_the_name() {
        let (_dir, path) = scenario_two();
        let skimmer = Skimmer::open(&path).unwrap();
        let entry = skimmer.fetch(42).unwrap().unwrap();
        assert_eq!(entry.name, b"readme");
        assert_eq!(entry.payload, EntryPayload::File(b"hi".to_vec()));
    }

    #[test]
    fn fetch_missing_handle_returns_none() {
        let (_dir, path) = scenario_two();
        let skimmer = Skimmer::open(&path).unwrap();
        assert!(skimmer.fetch(999).unwrap().is_none());
    }

    #[test]
    fn append_then_fetch_round_trips_and_updates_root_children() {
        let (_dir, path) = scenario_two();
        let mut skimmer = Skimmer::open(&path).unwrap();

        let symlink = Entry::new_symlink(7, ROOT_HANDLE, "link", 42);
        assert!(skimmer.append(&[symlink.clone()]).unwrap());

        let fetched = skimmer.fetch(7).unwrap().unwrap();
        assert_eq!(fetched.payload, EntryPayload::Symlink(42));

        let original_still_intact = skimmer.fetch(42).unwrap().unwrap();
        assert_eq!(original_still_intact.payload, EntryPayload::File(b"hi".to_vec()));

        let root = skimmer.fetch(ROOT_HANDLE).unwrap().unwrap();
        assert_eq!(root.payload, EntryPayload::Directory(vec![42, 7]));
    }

    #[test]
    fn delete_after_append_restores_byte_identical_archive() {
        let (_dir, path) = scenario_two();
        let original_bytes = fs::read(&path).unwrap();

        let mut skimmer = Skimmer::open(&path).unwrap();
        skimmer.append(&[Entry::new_symlink(7, ROOT_HANDLE, "link", 42)]).unwrap();
        skimmer.delete(&[7]).unwrap();

        let final_bytes = fs::read(&path).unwrap();
        assert_eq!(final_bytes, original_bytes);
    }

    #[test]
    fn delete_removes_fetchability_and_preserves_survivors() {
        let (_dir, path) = scenario_two();
        let mut skimmer = Skimmer::open(&path).unwrap();
        skimmer.append(&[Entry::new_symlink(7, ROOT_HANDLE, "link", 42)]).unwrap();

        assert!(skimmer.delete(&[7]).unwrap());
        assert!(skimmer.fetch(7).unwrap().is_none());
        assert_eq!(
            skimmer.fetch(42).unwrap().unwrap().payload,
            EntryPayload::File(b"hi".to_vec())
        );
    }

    #[test]
    fn create_path_builds_missing_directory_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archive.tevd");
        fs::write(&path, Archive::new(1024, "hello").save().unwrap()).unwrap();

        let mut skimmer = Skimmer::open(&path).unwrap();
        let file_handle = skimmer
            .create_path("a/b/c.txt", vec![0xAA], false)
            .unwrap();

        let file = skimmer.fetch(file_handle).unwrap().unwrap();
        assert_eq!(file.name, b"c.txt");
        assert_eq!(file.payload, EntryPayload::File(vec![0xAA]));

        let root = skimmer.fetch(ROOT_HANDLE).unwrap().unwrap();
        let EntryPayload::Directory(root_children) = &root.payload else {
            panic!("root must be a directory");
        };
        assert_eq!(root_children.len(), 1);
        let dir_a = skimmer.fetch(root_children[0]).unwrap().unwrap();
        assert_eq!(dir_a.name, b"a");
        let EntryPayload::Directory(a_children) = &dir_a.payload else {
            panic!("a must be a directory");
        };
        assert_eq!(a_children.len(), 1);
        let dir_b = skimmer.fetch(a_children[0]).unwrap().unwrap();
        assert_eq!(dir_b.name, b"b");
        assert_eq!(dir_b.payload, EntryPayload::Directory(vec![file_handle]));
    }

    #[test]
    fn create_path_without_overwrite_on_existing_path_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archive.tevd");
        fs::write(&path, Archive::new(1024, "hello").save().unwrap()).unwrap();

        let mut skimmer = Skimmer::open(&path).unwrap();
        skimmer.create_path("a.txt", vec![1], false).unwrap();

        assert!(matches!(
            skimmer.create_path("a.txt", vec![2], false),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn create_path_with_overwrite_replaces_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archive.tevd");
        fs::write(&path, Archive::new(1024, "hello").save().unwrap()).unwrap();

        let mut skimmer = Skimmer::open(&path).unwrap();
        let first = skimmer.create_path("a.txt", vec![1], false).unwrap();
        let second = skimmer.create_path("a.txt", vec![2, 2], true).unwrap();

        assert!(skimmer.fetch(first).unwrap().is_none());
        let replaced = skimmer.fetch(second).unwrap().unwrap();
        assert_eq!(replaced.payload, EntryPayload::File(vec![2, 2]));
        assert_eq!(replaced.name, b"a.txt");
    }

    #[test]
    fn reopening_reproduces_the_same_index() {
        let (_dir, path) = scenario_two();
        let mut skimmer = Skimmer::open(&path).unwrap();
        skimmer.append(&[Entry::new_symlink(7, ROOT_HANDLE, "link", 42)]).unwrap();

        let live_index = skimmer.index().clone();
        let live_footer = skimmer.footer_position();

        let reopened = Skimmer::open(&path).unwrap();
        assert_eq!(reopened.index(), &live_index);
        assert_eq!(reopened.footer_position(), live_footer);
    }

    #[test]
    fn seeded_rng_gives_deterministic_handle_allocation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archive.tevd");
        fs::write(&path, Archive::new(1024, "hello").save().unwrap()).unwrap();

        let mut a = Skimmer::open_seeded(&path, 42).unwrap();
        let handle_a = a.create_path("a.txt", vec![1], false).unwrap();

        fs::write(&path, Archive::new(1024, "hello").save().unwrap()).unwrap();
        let mut b = Skimmer::open_seeded(&path, 42).unwrap();
        let handle_b = b.create_path("a.txt", vec![1], false).unwrap();

        assert_eq!(handle_a, handle_b);
    }

    #[test]
    fn entry_block_size_matches_serialized_length() {
        let (_dir, path) = scenario_two();
        let skimmer = Skimmer::open(&path).unwrap();
        let entry = skimmer.fetch(42).unwrap().unwrap();
        let size = skimmer.entry_block_size(42).unwrap().unwrap();
        assert_eq!(size, entry.serialized_size().unwrap());
    }

    #[test]
    fn entry_block_size_of_unknown_handle_is_none() {
        let (_dir, path) = scenario_two();
        let skimmer = Skimmer::open(&path).unwrap();
        assert!(skimmer.entry_block_size(999).unwrap().is_none());
    }
}
