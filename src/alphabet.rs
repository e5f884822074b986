// This file is part of Passgen.
//
// Copyright (c) 2026  The Passgen developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Fixed character sets used to render derived passwords.
//!
//! Every alphabet is frozen once released. Editing one, even reordering
//! it, changes every password ever derived with it.

/// Number of character classes a password is required to cover.
pub const CLASS_COUNT: usize = 4;

/// Character class of an alphabet member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl CharClass {
    /// Classes in the order missing ones are filled in.
    pub const ALL: [CharClass; CLASS_COUNT] = [
        CharClass::Lowercase,
        CharClass::Uppercase,
        CharClass::Digit,
        CharClass::Symbol,
    ];

    pub fn of(ch: u8) -> Self {
        if ch.is_ascii_lowercase() {
            CharClass::Lowercase
        } else if ch.is_ascii_uppercase() {
            CharClass::Uppercase
        } else if ch.is_ascii_digit() {
            CharClass::Digit
        } else {
            CharClass::Symbol
        }
    }

    fn slot(self) -> usize {
        match self {
            CharClass::Lowercase => 0,
            CharClass::Uppercase => 1,
            CharClass::Digit => 2,
            CharClass::Symbol => 3,
        }
    }
}

/// An ordered character set partitioned into the four classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    characters: &'static [u8],
    classes: [&'static [u8]; CLASS_COUNT],
}

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

impl Alphabet {
    pub const V1: Self = Self {
        characters: b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&*+-=?@^_~",
        classes: [LOWERCASE, UPPERCASE, DIGITS, b"!#$%&*+-=?@^_~"],
    };

    pub const V2: Self = Self {
        characters: b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?/~",
        classes: [
            LOWERCASE,
            UPPERCASE,
            DIGITS,
            b"!@#$%^&*()_+-=[]{}|;:,.<>?/~",
        ],
    };

    /// All characters in index order.
    pub fn characters(&self) -> &'static [u8] {
        self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Members of `class`, in the order they are indexed during substitution.
    pub fn members(&self, class: CharClass) -> &'static [u8] {
        self.classes[class.slot()]
    }

    pub fn contains(&self, ch: u8) -> bool {
        self.characters.contains(&ch)
    }

    pub(crate) fn class_counts(chars: &[u8]) -> [usize; CLASS_COUNT] {
        let mut counts = [0usize; CLASS_COUNT];
        for &ch in chars {
            counts[CharClass::of(ch).slot()] += 1;
        }
        counts
    }

    pub(crate) fn count_of(counts: &[usize; CLASS_COUNT], class: CharClass) -> usize {
        counts[class.slot()]
    }
}
