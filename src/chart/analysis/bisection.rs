/*
Copyright 2022 Jakub Lewandowski

This file is part of Isotach Chart (isochart).

Isotach Chart (isochart) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

Isotach Chart (isochart) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Isotach Chart (isochart). If not, see https://www.gnu.org/licenses/.
*/

//! Module containg methods for conducting
//! binary search (bisection) of coordinates
//! surrounding searched values.
//!
//! Coordinates in reanalysis datasets can be sorted either way
//! (latitudes usually descend from north to south) so all
//! functions here handle both orderings.

use crate::errors::SearchError;
use crate::Float;

/// Core bisection function, simply an implementation
/// of binary search algorithm adapted to searching values
/// in-between the set items.
fn binary_search(array: &[Float], x: Float) -> Result<usize, SearchError> {
    let (first, last) = match (array.first(), array.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(SearchError::EmptyArray),
    };

    if !x.is_finite() || (x < first && x < last) || (x > first && x > last) {
        return Err(SearchError::OutOfBounds);
    }

    let mut lo = 0;
    let mut hi = array.len() - 1;

    // if the array is sorted descendingly we use a loop with reversed signs
    if first < last {
        while lo < hi {
            let mid = (lo + hi) / 2;

            if array[mid] >= x {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
    } else {
        while lo < hi {
            let mid = (lo + hi) / 2;

            if array[mid] <= x {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
    }

    Ok(lo)
}

/// Finds the index of the closest item preceding (or equal to)
/// the searched value in the array order.
pub fn find_left_closest(array: &[Float], x: Float) -> Result<usize, SearchError> {
    let found_index = binary_search(array, x)?;

    if (array[found_index] - x).abs() <= Float::EPSILON || found_index == 0 {
        Ok(found_index)
    } else {
        Ok(found_index - 1)
    }
}

/// Finds indices of two neighbouring items enclosing the searched value
/// and the fraction of the distance between them at which the value lies.
///
/// At the last item both indices are equal and the fraction is zero.
pub fn bracket(array: &[Float], x: Float) -> Result<(usize, usize, Float), SearchError> {
    let left = find_left_closest(array, x)?;
    let right = (left + 1).min(array.len() - 1);

    if left == right {
        return Ok((left, right, 0.0));
    }

    let fraction = (x - array[left]) / (array[right] - array[left]);

    Ok((left, right, fraction))
}

#[cfg(test)]
mod tests {
    use super::{bracket, find_left_closest};
    use crate::errors::SearchError;
    use float_cmp::approx_eq;

    const ASCENDING: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
    const DESCENDING: [f64; 5] = [90.0, 89.75, 89.5, 89.25, 89.0];

    #[test]
    fn left_closest_ascending() {
        assert_eq!(find_left_closest(&ASCENDING, 0.0), Ok(0));
        assert_eq!(find_left_closest(&ASCENDING, 0.3), Ok(1));
        assert_eq!(find_left_closest(&ASCENDING, 0.5), Ok(2));
        assert_eq!(find_left_closest(&ASCENDING, 1.0), Ok(4));
    }

    #[test]
    fn left_closest_descending() {
        assert_eq!(find_left_closest(&DESCENDING, 90.0), Ok(0));
        assert_eq!(find_left_closest(&DESCENDING, 89.6), Ok(1));
        assert_eq!(find_left_closest(&DESCENDING, 89.0), Ok(4));
    }

    #[test]
    fn out_of_bounds() {
        assert_eq!(
            find_left_closest(&ASCENDING, 1.5),
            Err(SearchError::OutOfBounds)
        );
        assert_eq!(
            find_left_closest(&DESCENDING, 91.0),
            Err(SearchError::OutOfBounds)
        );
        assert_eq!(
            find_left_closest(&ASCENDING, f64::NAN),
            Err(SearchError::OutOfBounds)
        );
        assert_eq!(find_left_closest(&[], 0.0), Err(SearchError::EmptyArray));
    }

    #[test]
    fn bracketing() {
        let (l, r, f) = bracket(&ASCENDING, 0.3).unwrap();
        assert_eq!((l, r), (1, 2));
        assert!(approx_eq!(f64, f, 0.2, epsilon = 1e-12));

        let (l, r, f) = bracket(&DESCENDING, 89.3).unwrap();
        assert_eq!((l, r), (2, 3));
        assert!(approx_eq!(f64, f, 0.8, epsilon = 1e-9));

        let (l, r, f) = bracket(&ASCENDING, 1.0).unwrap();
        assert_eq!((l, r), (4, 4));
        assert!(approx_eq!(f64, f, 0.0));
    }
}
