use std::collections::VecDeque;

use crate::types::Song;

/// Songs waiting to be played, front plays next. Never holds the current song.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    songs: VecDeque<Song>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, song: Song) {
        self.songs.push_back(song);
    }

    pub fn push_front(&mut self, song: Song) {
        self.songs.push_front(song);
    }

    pub fn pop_front(&mut self) -> Option<Song> {
        self.songs.pop_front()
    }

    /// Out-of-range indices leave the queue untouched.
    pub fn remove(&mut self, index: usize) -> Option<Song> {
        self.songs.remove(index)
    }

    pub fn clear(&mut self) {
        self.songs.clear();
    }

    pub fn replace(&mut self, songs: impl IntoIterator<Item = Song>) {
        self.songs = songs.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    pub fn to_vec(&self) -> Vec<Song> {
        self.songs.iter().cloned().collect()
    }
}
