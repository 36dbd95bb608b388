//! Enumeration of every slider combination.

use walkscore_models::{ImportanceLevel, Sliders};

/// Number of slider axes.
const AXIS_COUNT: usize = Sliders::AXES.len();

/// Number of distinct slider combinations (5^4).
#[allow(clippy::cast_possible_truncation)]
pub const COMBINATION_COUNT: usize = ImportanceLevel::ALL.len().pow(AXIS_COUNT as u32);

/// Returns every slider combination in lexicographic order over the axes
/// `slope`, `streets`, `amenity`, `crime`.
#[must_use]
pub fn all_combinations() -> Vec<Sliders> {
    let mut combinations = Vec::with_capacity(COMBINATION_COUNT);
    let mut levels = [ImportanceLevel::NotImportant; AXIS_COUNT];
    extend(&mut levels, 0, &mut combinations);
    combinations
}

fn extend(
    levels: &mut [ImportanceLevel; AXIS_COUNT],
    axis: usize,
    combinations: &mut Vec<Sliders>,
) {
    if axis == AXIS_COUNT {
        let [slope, streets, amenity, crime] = *levels;
        combinations.push(Sliders::new(slope, streets, amenity, crime));
        return;
    }

    for level in ImportanceLevel::ALL {
        levels[axis] = level;
        extend(levels, axis + 1, combinations);
    }
}
