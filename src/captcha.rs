use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticChallenge {
    pub left: u32,
    pub right: u32,
}

impl ArithmeticChallenge {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            left: rng.gen_range(1..=10),
            right: rng.gen_range(1..=10),
        }
    }

    pub fn question(&self) -> String {
        format!("{} + {} = ?", self.left, self.right)
    }

    pub fn verify(&self, answer: &str) -> bool {
        let answer = answer.trim();
        if answer.is_empty() || !answer.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        answer
            .parse::<u32>()
            .is_ok_and(|n| n == self.left + self.right)
    }
}
