// Sample documents with known classifications and rewrites
#![allow(dead_code)]

/// Opening of Hamlet with title, act/scene headers, cues, inline speech and stage directions
pub const PLAY_TEXT: &str = "THE TRAGEDY OF HAMLET, PRINCE OF DENMARK

ACT I

SCENE I. Elsinore. A platform before the Castle.

[Enter Francisco and Bernardo.]

BERNARDO.
Who's there?

FRANCISCO.
Nay, answer me: stand, and unfold yourself.

BERNARDO.
Long live the King!

FRANCISCO.
You come most carefully upon your hour.

BERNARDO.
'Tis now struck twelve. Get thee to bed, Francisco.

FRANCISCO.
For this relief much thanks. 'Tis bitter cold,
And I am sick at heart.

Hor. Friends to this ground, and liegemen to the Dane.

[Exit Francisco.]
";

/// PLAY_TEXT after the dialogue rewrite; headers and directions are byte-identical
pub const PLAY_EXPECTED: &str = "THE TRAGEDY OF HAMLET, PRINCE OF DENMARK

ACT I

SCENE I. Elsinore. A platform before the Castle.

[Enter Francisco and Bernardo.]

BERNARDO.
Who's there?

FRANCISCO.
Nay answer me stand and unfold yourself.

BERNARDO.
Long live the King!

FRANCISCO.
You come most carefully upon your hour.

BERNARDO.
'Tis now struck twelve. Get thee to bed Francisco.

FRANCISCO.
For this relief much thanks. 'Tis bitter cold
And I am sick at heart.

Hor. Friends to this ground and liegemen to the Dane.

[Exit Francisco.]
";

pub const PLAY_LINES: usize = 30;
pub const PLAY_LINES_MODIFIED: usize = 4;
pub const PLAY_COMMAS: usize = 5;

/// Seven numbered sonnet fragments; no speaker cues anywhere
pub const SONNETS_TEXT: &str = "THE SONNETS, by William Shakespeare

  I

From fairest creatures we desire increase,
That thereby beauty's rose might never die,

  II

When forty winters shall besiege thy brow,
And dig deep trenches in thy beauty's field,

  III

Look in thy glass and tell the face thou viewest,
Now is the time that face should form another;

  IV

Unthrifty loveliness, why dost thou spend
Upon thyself thy beauty's legacy?

  V

Those hours, that with gentle work did frame
The lovely gaze where every eye doth dwell,

  VI

Then let not winter's ragged hand deface
In thee thy summer, ere thou be distilled:

  VII

Lo, in the orient when the gracious light
Lifts up his burning head, each under eye
";

/// Speech carried by quotation marks with narrator tags
pub const NARRATIVE_TEXT: &str = "VENUS AND ADONIS

'Thrice fairer than myself,' thus she began,
'The field's chief flower, sweet above compare,
'Stain to all nymphs, more lovely than a man,
'More white and red than doves or roses are;
'Nature that made thee, with herself at strife,
'Saith that the world hath ending with thy life.
'Vouchsafe, thou wonder, to alight thy steed,
'And rein his proud head to the saddle-bow;
'If thou wilt deign this favour, for thy meed
'A thousand honey secrets shalt thou know:
'Here come and sit, where never serpent hisses,
'And being set, I'll smother thee with kisses.'
'Fie, no more of love!' quoth he, 'the sun doth burn my face.'
";
