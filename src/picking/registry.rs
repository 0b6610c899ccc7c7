use rustc_hash::FxHashMap;

use super::{ColorKey, PickingError};

/// Hands out unique picking colors and maps them back to the objects they were issued for.
///
/// Keys count up from `0_0_1`. Released keys are reused, most recently released first, before the
/// counter moves on. [`ColorKey::NONE`] is never issued.
#[derive(Debug)]
pub struct ColorRegistry<T> {
    objects: FxHashMap<ColorKey, T>,
    next: u32,
    free: Vec<ColorKey>,
}

impl<T> Default for ColorRegistry<T> {
    fn default() -> Self {
        Self {
            objects: Default::default(),
            next: 1,
            free: Default::default(),
        }
    }
}

impl<T> ColorRegistry<T> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn register(&mut self, object: T) -> Result<ColorKey, PickingError> {
        let key = match self.free.pop() {
            Some(key) => key,
            None => {
                let key = ColorKey::from_index(self.next).ok_or(PickingError::Exhausted)?;
                self.next += 1;
                key
            }
        };

        self.objects.insert(key, object);
        Ok(key)
    }

    pub fn unregister(&mut self, key: ColorKey) -> Option<T> {
        let object = self.objects.remove(&key)?;
        self.free.push(key);
        Some(object)
    }

    #[inline]
    pub fn get(&self, key: ColorKey) -> Option<&T> {
        self.objects.get(&key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: ColorKey) -> Option<&mut T> {
        self.objects.get_mut(&key)
    }

    pub fn contains(&self, key: ColorKey) -> bool {
        self.objects.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorKey, &T)> {
        self.objects.iter().map(|(key, object)| (*key, object))
    }
}
