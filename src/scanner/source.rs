/// Pull-based character stream over an owned input buffer.
///
/// `get` consumes, `peek` looks without consuming, and `putback` undoes the
/// most recent `get`. The line counter is owned by the scanner, which is the
/// only party that knows which characters are line breaks.
#[derive(Debug, Default)]
pub struct Source {
    input: Vec<u8>,
    position: usize,
}

impl Source {
    pub fn new<B>(input: B) -> Source
    where
        B: Into<Vec<u8>>,
    {
        Source {
            input: input.into(),
            position: 0,
        }
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    pub fn get(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    pub fn putback(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.input.len()
    }
}
