// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::borrow::Cow;

/// A value with a stable byte representation that can be inserted into a Bloom filter.
///
/// Text is encoded as UTF-8 and integers use their decimal text form, so `42`, `"42"` and
/// `b"42"` are all the same element. Byte slices and arrays are used verbatim.
///
/// Custom types may implement this as long as equal values always produce equal bytes.
pub trait Element {
    /// Returns the bytes hashed for this element.
    fn element_bytes(&self) -> Cow<'_, [u8]>;
}

impl<T: Element + ?Sized> Element for &T {
    fn element_bytes(&self) -> Cow<'_, [u8]> {
        (**self).element_bytes()
    }
}

impl Element for str {
    fn element_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Element for String {
    fn element_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Element for char {
    fn element_bytes(&self) -> Cow<'_, [u8]> {
        let mut buf = [0u8; 4];
        Cow::Owned(self.encode_utf8(&mut buf).as_bytes().to_vec())
    }
}

impl Element for [u8] {
    fn element_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> Element for [u8; N] {
    fn element_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl Element for Vec<u8> {
    fn element_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

macro_rules! impl_element_for_integer {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn element_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )*
    };
}

impl_element_for_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
