use super::ColorKey;

/// Hover change between two consecutive frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickingTransition {
    None,
    Leave(ColorKey),
    Enter(ColorKey),
    /// The pointer went straight from one object to another. Leave is reported before enter.
    Swap { leave: ColorKey, enter: ColorKey },
}

impl PickingTransition {
    pub fn between(previous: ColorKey, current: ColorKey) -> Self {
        if previous == current {
            return Self::None;
        }

        match (previous.is_none(), current.is_none()) {
            (true, _) => Self::Enter(current),
            (false, true) => Self::Leave(previous),
            (false, false) => Self::Swap {
                leave: previous,
                enter: current,
            },
        }
    }

    pub fn left(&self) -> Option<ColorKey> {
        match *self {
            Self::Leave(key) | Self::Swap { leave: key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn entered(&self) -> Option<ColorKey> {
        match *self {
            Self::Enter(key) | Self::Swap { enter: key, .. } => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ColorKey = ColorKey::new(0, 0, 1);
    const B: ColorKey = ColorKey::new(0, 0, 2);

    #[test]
    fn transitions() {
        assert_eq!(PickingTransition::between(A, A), PickingTransition::None);
        assert_eq!(
            PickingTransition::between(ColorKey::NONE, ColorKey::NONE),
            PickingTransition::None
        );
        assert_eq!(PickingTransition::between(ColorKey::NONE, A), PickingTransition::Enter(A));
        assert_eq!(PickingTransition::between(A, ColorKey::NONE), PickingTransition::Leave(A));

        let swap = PickingTransition::between(A, B);
        assert_eq!((swap.left(), swap.entered()), (Some(A), Some(B)));
    }
}
