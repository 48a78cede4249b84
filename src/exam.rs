//! Drawing mock exam papers from a categorised question bank.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::models::{MockExam, Question, QuizSet};

/// Uniform sample of up to `count` questions, without replacement.
pub fn draw_random<R: Rng + ?Sized>(bank: &[Question], count: usize, rng: &mut R) -> Vec<Question> {
    bank.choose_multiple(rng, count).cloned().collect()
}

/// Sample `count` questions spread evenly over `categories`.
///
/// Each category gets `count / n` questions, the first `count % n`
/// categories one more. Shortfalls are topped up from whatever is left in
/// the bank, and the paper is shuffled at the end.
pub fn draw_balanced<R: Rng + ?Sized>(
    bank: &[Question],
    count: usize,
    categories: &[String],
    rng: &mut R,
) -> Vec<Question> {
    if categories.is_empty() {
        return draw_random(bank, count, rng);
    }

    let count = count.min(bank.len());
    let per_category = count / categories.len();
    let remainder = count % categories.len();

    let mut taken = vec![false; bank.len()];
    let mut picked: Vec<usize> = Vec::with_capacity(count);

    for (position, category) in categories.iter().enumerate() {
        let quota = per_category + usize::from(position < remainder);
        let mut pool: Vec<usize> = bank
            .iter()
            .enumerate()
            .filter(|(_, q)| q.category.as_deref() == Some(category.as_str()))
            .map(|(index, _)| index)
            .collect();
        if pool.len() < quota {
            debug!(category = %category, available = pool.len(), quota, "category short");
        }
        pool.shuffle(rng);
        for index in pool.into_iter().take(quota) {
            taken[index] = true;
            picked.push(index);
        }
    }

    if picked.len() < count {
        let mut rest: Vec<usize> = (0..bank.len()).filter(|&i| !taken[i]).collect();
        rest.shuffle(rng);
        picked.extend(rest.into_iter().take(count - picked.len()));
    }

    picked.shuffle(rng);
    picked.into_iter().map(|index| bank[index].clone()).collect()
}

impl MockExam {
    /// Draw a paper according to the exam config.
    pub fn assemble<R: Rng + ?Sized>(&self, rng: &mut R) -> QuizSet {
        self.assemble_with_count(self.config.total_questions, rng)
    }

    pub fn assemble_with_count<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> QuizSet {
        if count > self.bank.len() {
            warn!(
                exam = %self.config.exam_id,
                requested = count,
                available = self.bank.len(),
                "bank smaller than requested paper"
            );
        }
        let questions = draw_balanced(&self.bank, count, &self.config.categories, rng);
        QuizSet::new(Some(self.config.exam_title.clone()), questions)
    }
}
