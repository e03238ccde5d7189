use crate::Question;
use alloc::vec::Vec;

/// Ion names and their formulas, written as `FORMULA CHARGE` (e.g. `CO3 2-`).
const IONS: [(&str, &str); 29] = [
    ("What is the formula of a hydrogen ion?", "H +"),
    ("What is the formula of a lithium ion?", "Li +"),
    ("What is the formula of a sodium ion?", "Na +"),
    ("What is the formula of a potassium ion?", "K +"),
    ("What is the formula of a rubidium ion?", "Rb +"),
    ("What is the formula of a magnesium ion?", "Mg 2+"),
    ("What is the formula of a calcium ion?", "Ca 2+"),
    ("What is the formula of a strontium ion?", "Sr 2+"),
    ("What is the formula of a barium ion?", "Ba 2+"),
    ("What is the formula of an aluminium ion?", "Al 3+"),
    ("What is the formula of an iron(II) ion?", "Fe 2+"),
    ("What is the formula of an iron(III) ion?", "Fe 3+"),
    ("What is the formula of a copper(I) ion?", "Cu +"),
    ("What is the formula of a copper(II) ion?", "Cu 2+"),
    ("What is the formula of a zinc ion?", "Zn 2+"),
    ("What is the formula of a silver ion?", "Ag +"),
    ("What is the formula of a fluoride ion?", "F -"),
    ("What is the formula of a chloride ion?", "Cl -"),
    ("What is the formula of a bromide ion?", "Br -"),
    ("What is the formula of a iodide ion?", "I -"),
    ("What is the formula of a oxide ion?", "O 2-"),
    ("What is the formula of a sulfide ion?", "S 2-"),
    ("What is the formula of a nitride ion?", "N 3-"),
    ("What is the formula of a phosphide ion?", "P 3-"),
    ("What is the formula of an ammonium ion?", "NH4 +"),
    ("What is the formula of a nitrate ion?", "NO3 -"),
    ("What is the formula of a hydroxide ion?", "OH -"),
    ("What is the formula of a carbonate ion?", "CO3 2-"),
    ("What is the formula of a sulfate ion?", "SO4 2-"),
];

/// Returns the built-in ion formula catalog in its declared order.
pub fn catalog() -> Vec<Question> {
    IONS.iter().map(|&(prompt, answer)| Question::new(prompt, answer)).collect()
}
