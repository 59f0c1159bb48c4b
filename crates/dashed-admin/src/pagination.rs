//! Page arithmetic and the compact page sequence of list screens

use dashed_conf::PageWindowSettings;
use serde::Serialize;

/// How many page links the compact pager keeps around the edges and the
/// current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
	pub left_edge: u64,
	pub left_current: u64,
	pub right_current: u64,
	pub right_edge: u64,
}

impl Default for PageWindow {
	fn default() -> Self {
		PageWindowSettings::default().into()
	}
}

impl From<PageWindowSettings> for PageWindow {
	fn from(settings: PageWindowSettings) -> Self {
		Self {
			left_edge: settings.left_edge,
			left_current: settings.left_current,
			right_current: settings.right_current,
			right_edge: settings.right_edge,
		}
	}
}

/// Position in a paginated list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
	count: u64,
	per_page: u64,
	page: u64,
}

impl Pager {
	/// `page` is 1-based; `per_page` must be positive
	pub fn new(count: u64, per_page: usize, page: u64) -> Self {
		Self {
			count,
			per_page: (per_page as u64).max(1),
			page: page.max(1),
		}
	}

	pub fn count(&self) -> u64 {
		self.count
	}

	pub fn page(&self) -> u64 {
		self.page
	}

	pub fn per_page(&self) -> u64 {
		self.per_page
	}

	/// `ceil(count / per_page)`
	pub fn total_pages(&self) -> u64 {
		self.count.div_ceil(self.per_page)
	}

	/// Index of the first row of the current page
	pub fn offset(&self) -> u64 {
		(self.page - 1) * self.per_page
	}

	pub fn has_previous(&self) -> bool {
		self.page > 1
	}

	pub fn has_next(&self) -> bool {
		self.page < self.total_pages()
	}

	/// Compact page sequence; `None` marks a gap
	///
	/// Keeps the first `left_edge` pages, the last `right_edge` pages and the
	/// pages from `page - left_current` through `page + right_current`.
	///
	/// # Examples
	///
	/// ```
	/// use dashed_admin::{PageWindow, Pager};
	///
	/// let window = PageWindow::default();
	/// assert_eq!(Pager::new(25, 10, 1).iter_pages(window), vec![Some(1), Some(2), Some(3)]);
	///
	/// let pages = Pager::new(1000, 10, 50).iter_pages(window);
	/// assert_eq!(
	///     pages,
	///     vec![
	///         Some(1), Some(2), None,
	///         Some(48), Some(49), Some(50), Some(51), Some(52), Some(53), Some(54), Some(55),
	///         None, Some(99), Some(100),
	///     ]
	/// );
	/// ```
	pub fn iter_pages(&self, window: PageWindow) -> Vec<Option<u64>> {
		let pages = self.total_pages();
		let mut runs = [
			(1, window.left_edge.min(pages)),
			(
				self.page.saturating_sub(window.left_current).max(1),
				self.page.saturating_add(window.right_current).min(pages),
			),
			(pages.saturating_sub(window.right_edge) + 1, pages),
		];

		runs.sort_by_key(|(start, _)| *start);

		let mut sequence = Vec::new();
		let mut last = 0;
		for (start, end) in runs {
			for num in start.max(last + 1)..=end {
				if last + 1 != num {
					sequence.push(None);
				}
				sequence.push(Some(num));
				last = num;
			}
		}
		sequence
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	fn numbers(pages: &[Option<u64>]) -> Vec<u64> {
		pages.iter().flatten().copied().collect()
	}

	#[rstest]
	#[case(0, 10, 1, vec![])]
	#[case(10, 10, 1, vec![Some(1)])]
	#[case(11, 10, 2, vec![Some(1), Some(2)])]
	#[case(25, 10, 1, vec![Some(1), Some(2), Some(3)])]
	fn test_short_lists_have_no_gap(
		#[case] count: u64,
		#[case] per_page: usize,
		#[case] page: u64,
		#[case] expected: Vec<Option<u64>>,
	) {
		assert_eq!(Pager::new(count, per_page, page).iter_pages(PageWindow::default()), expected);
	}

	#[rstest]
	fn test_window_around_current_is_inclusive() {
		// Act
		let pages = Pager::new(1000, 10, 50).iter_pages(PageWindow::default());

		// Assert
		let mut expected = vec![Some(1), Some(2), None];
		expected.extend((48..=55).map(Some));
		expected.extend([None, Some(99), Some(100)]);
		assert_eq!(pages, expected);
	}

	#[rstest]
	fn test_current_near_start_has_no_leading_gap() {
		// Act
		let pages = Pager::new(1000, 10, 3).iter_pages(PageWindow::default());

		// Assert
		assert_eq!(
			pages,
			vec![
				Some(1),
				Some(2),
				Some(3),
				Some(4),
				Some(5),
				Some(6),
				Some(7),
				Some(8),
				None,
				Some(99),
				Some(100)
			]
		);
	}

	#[rstest]
	fn test_current_near_end_has_no_trailing_gap() {
		// Act
		let pages = Pager::new(1000, 10, 97).iter_pages(PageWindow::default());

		// Assert
		assert_eq!(
			pages,
			vec![
				Some(1),
				Some(2),
				None,
				Some(95),
				Some(96),
				Some(97),
				Some(98),
				Some(99),
				Some(100)
			]
		);
	}

	#[rstest]
	fn test_adjacent_runs_have_no_gap() {
		// Window starts at 3, right after the left edge
		let pages = Pager::new(1000, 10, 5).iter_pages(PageWindow::default());

		assert_eq!(pages[..3], [Some(1), Some(2), Some(3)]);
		assert!(!pages[..10].contains(&None));
	}

	#[rstest]
	fn test_page_arithmetic() {
		// Arrange
		let pager = Pager::new(95, 10, 3);

		// Assert
		assert_eq!(pager.total_pages(), 10);
		assert_eq!(pager.offset(), 20);
		assert!(pager.has_previous());
		assert!(pager.has_next());
		assert!(!Pager::new(95, 10, 10).has_next());
	}

	proptest! {
		#[test]
		fn prop_sequence_is_compact(count in 0u64..5000, per_page in 1usize..50, page in 1u64..600) {
			let pager = Pager::new(count, per_page, page);
			let pages = pager.iter_pages(PageWindow::default());
			let nums = numbers(&pages);

			// strictly increasing, within range
			prop_assert!(nums.windows(2).all(|w| w[0] < w[1]));
			prop_assert!(nums.iter().all(|n| *n >= 1 && *n <= pager.total_pages()));

			// never starts or ends with a gap, never two gaps in a row
			prop_assert_ne!(pages.first(), Some(&None));
			prop_assert_ne!(pages.last(), Some(&None));
			prop_assert!(pages.windows(2).all(|w| !(w[0].is_none() && w[1].is_none())));

			// a gap sits exactly between non-adjacent numbers
			for w in pages.windows(2) {
				if let (Some(a), Some(b)) = (w[0], w[1]) {
					prop_assert_eq!(a + 1, b);
				}
			}

			if pager.total_pages() > 0 {
				prop_assert_eq!(nums.first(), Some(&1));
				prop_assert_eq!(nums.last(), Some(&pager.total_pages()));
			}
			if page <= pager.total_pages() {
				prop_assert!(nums.contains(&page));
			}
		}
	}
}
